//! # sitemgr-ref-host
//!
//! In-memory reference host for the Site Manager role gate.
//!
//! The host keeps roles per tenant, a principal directory and the
//! privacy-policy page setting. [`Site`] wires a host to a
//! [`RoleBuilder`](sitemgr_policy::RoleBuilder) and an
//! [`ActionGuard`](sitemgr_policy::ActionGuard) and plays the platform's part:
//! it performs writes and emits the matching events.
//!
//! Scenarios:
//!
//! 1. **Provisioning**: single site, then a network with a tenant lacking
//!    the base role and an archived tenant.
//! 2. **Role change**: direct demotion of an administrator is reverted.
//! 3. **Deletion**: administrators cannot be deleted by the restricted role.
//! 4. **Screens**: user-edit and appearance screens.
//! 5. **Registration**: administrators created by the restricted role are
//!    demoted.
//! 6. **Privacy policy**: page-scoped capability injection.
//!
//! All accounts are fictional.

pub mod host;
pub mod scenarios;
pub mod seed;
pub mod site;

pub use host::InMemoryHost;
pub use site::Site;

#[cfg(test)]
mod tests {
    use sitemgr_contracts::{
        capability::Capability,
        error::SiteManagerError,
        event::TenantId,
        role::RoleId,
    };
    use sitemgr_core::{
        traits::{RoleRegistry, TenantDirectory},
        Filters, TextFilter,
    };
    use sitemgr_policy::{bundle::NETWORK_USERS, BundleFlags, SiteManagerConfig};

    use super::{seed, Site};

    fn activated() -> Site {
        let site = Site::stock(seed::single_site());
        site.activate().expect("activation should succeed");
        site
    }

    fn site_manager() -> RoleId {
        RoleId::new(RoleId::SITE_MANAGER)
    }

    // ── Provisioning ─────────────────────────────────────────────────────────

    #[test]
    fn activation_builds_editor_plus_bundles() {
        let site = activated();
        let role = site.host.get_role(&site_manager()).expect("role registered");

        assert_eq!(role.label, "Site Manager");
        assert!(role.capabilities.has(&Capability::new("edit_others_pages")));
        assert!(role.capabilities.has(&Capability::new("create_users")));
        assert!(role.capabilities.has(&Capability::new("switch_themes")));
        assert!(role.capabilities.has(&Capability::new("manage_woocommerce")));
        assert!(!role.capabilities.has(&Capability::new(NETWORK_USERS)));
        assert!(!role.capabilities.has(&Capability::new("manage_options")));
    }

    #[test]
    fn activation_is_idempotent() {
        let site = activated();
        let first = site.host.get_role(&site_manager());
        site.activate().unwrap();
        assert_eq!(site.host.get_role(&site_manager()), first);
    }

    #[test]
    fn custom_config_and_filters_reach_the_host() {
        let config = SiteManagerConfig {
            bundles: BundleFlags {
                edit_woocommerce: false,
                ..BundleFlags::default()
            },
            ..SiteManagerConfig::default()
        };
        let mut filters = Filters::new();
        filters.add_capabilities(|mut caps| {
            caps.grant("export");
            caps
        });

        let site = Site::new(seed::single_site(), &config, filters);
        site.activate().unwrap();
        let role = site.host.get_role(&site_manager()).unwrap();

        assert!(role.capabilities.has(&Capability::new("export")));
        assert!(!role.capabilities.has(&Capability::new("manage_woocommerce")));
    }

    #[test]
    fn network_activation_skips_tenants_without_base_role() {
        let site = Site::stock(seed::network(3, &[2]));
        let report = site.activate().unwrap();

        assert_eq!(report.rebuilt, vec![TenantId(1), TenantId(3)]);
        assert_eq!(report.skipped, vec![TenantId(2)]);
        assert!(site.host.role_on(TenantId(2), &site_manager()).is_none());

        let role = site.host.role_on(TenantId(3), &site_manager()).unwrap();
        assert!(role.capabilities.has(&Capability::new(NETWORK_USERS)));
        assert_eq!(site.host.current_tenant(), TenantId::PRIMARY);
    }

    #[test]
    fn network_activation_stops_at_archived_tenant() {
        let site = Site::stock(seed::network(3, &[]));
        site.host.archive(TenantId(2));

        let err = site.activate().unwrap_err();
        assert!(matches!(err, SiteManagerError::TenantSwitch { tenant: 2, .. }));

        assert!(site.host.role_on(TenantId(1), &site_manager()).is_some());
        assert!(site.host.role_on(TenantId(3), &site_manager()).is_none());
        assert_eq!(site.host.current_tenant(), TenantId::PRIMARY);
    }

    #[test]
    fn report_serializes() {
        let site = Site::stock(seed::single_site());
        let report = site.activate().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["role"], "cgit_site_manager");
        assert_eq!(json["rebuilt"], serde_json::json!([1]));
    }

    // ── Role change ──────────────────────────────────────────────────────────

    #[test]
    fn demoting_administrator_is_reverted_and_denied() {
        let site = activated();
        let ctx = site.request_as("sam");
        let root = site.principal("root").unwrap();

        let err = site.change_role(&ctx, root.id, &site_manager()).unwrap_err();

        assert!(err.is_access_denied());
        assert_eq!(site.principal("root").unwrap().roles, vec![RoleId::administrator()]);
    }

    #[test]
    fn changing_editor_role_goes_through() {
        let site = activated();
        let ctx = site.request_as("sam");
        let ed = site.principal("ed").unwrap();

        site.change_role(&ctx, ed.id, &RoleId::new("author")).unwrap();
        assert_eq!(site.principal("ed").unwrap().roles, vec![RoleId::new("author")]);
    }

    #[test]
    fn administrator_may_demote_administrator() {
        let site = activated();
        let ctx = site.request_as("root");
        let ops = site.principal("ops").unwrap();

        site.change_role(&ctx, ops.id, &RoleId::new("editor")).unwrap();
        assert_eq!(site.principal("ops").unwrap().roles, vec![RoleId::new("editor")]);
    }

    #[test]
    fn restricted_principal_cannot_promote_editor_to_administrator() {
        let site = activated();
        let ctx = site.request_as("sam");
        let ed = site.principal("ed").unwrap();

        let err = site.change_role(&ctx, ed.id, &RoleId::administrator()).unwrap_err();

        assert!(err.is_access_denied());
        assert_eq!(site.principal("ed").unwrap().roles, vec![RoleId::new("editor")]);
    }

    #[test]
    fn restricted_principal_cannot_promote_itself() {
        let site = activated();
        let ctx = site.request_as("sam");
        let sam = site.principal("sam").unwrap();

        let err = site.change_role(&ctx, sam.id, &RoleId::administrator()).unwrap_err();

        assert!(err.is_access_denied());
        assert_eq!(site.principal("sam").unwrap().roles, vec![site_manager()]);
    }

    #[test]
    fn filtered_role_name_cannot_replace_administrator() {
        let mut filters = Filters::new();
        filters.add_text(TextFilter::RoleName, |_| RoleId::ADMINISTRATOR.to_string());
        let site = Site::new(seed::single_site(), &SiteManagerConfig::default(), filters);

        let err = site.activate().unwrap_err();
        assert!(matches!(err, SiteManagerError::ConfigError { .. }));

        let admin = site.host.get_role(&RoleId::administrator()).unwrap();
        assert_eq!(admin, seed::administrator());
    }

    // ── Registration and profile ─────────────────────────────────────────────

    #[test]
    fn restricted_principal_cannot_register_administrator() {
        let site = activated();
        let ctx = site.request_as("sam");

        let created = site.register(&ctx, "mallory", &RoleId::administrator()).unwrap();
        assert_eq!(created.roles, vec![site_manager()]);
    }

    #[test]
    fn restricted_principal_cannot_promote_via_profile() {
        let site = activated();
        let ctx = site.request_as("sam");
        let ana = site.principal("ana").unwrap();

        site.update_profile(&ctx, ana.id, &[RoleId::administrator()]).unwrap();
        assert_eq!(site.principal("ana").unwrap().roles, vec![site_manager()]);
    }

    #[test]
    fn administrator_registration_is_untouched() {
        let site = activated();
        let ctx = site.request_as("root");

        let created = site.register(&ctx, "trent", &RoleId::administrator()).unwrap();
        assert_eq!(created.roles, vec![RoleId::administrator()]);
    }

    #[test]
    fn registration_returns_the_new_account_on_duplicate_login() {
        let site = activated();
        let ctx = site.request_as("root");
        let existing = site.principal("ed").unwrap();

        let created = site.register(&ctx, "ed", &RoleId::new("author")).unwrap();

        assert_ne!(created.id, existing.id);
        assert_eq!(created.roles, vec![RoleId::new("author")]);
    }

    // ── Deletion ─────────────────────────────────────────────────────────────

    #[test]
    fn restricted_principal_cannot_delete_administrator() {
        let site = activated();
        let ctx = site.request_as("sam");
        let ops = site.principal("ops").unwrap();

        let err = site.delete(&ctx, ops.id).unwrap_err();
        match err {
            SiteManagerError::AccessDenied { status, .. } => assert_eq!(status, 403),
            other => panic!("expected AccessDenied, got {other:?}"),
        }
        assert!(site.principal("ops").is_ok());
    }

    #[test]
    fn restricted_principal_deletes_editor() {
        let site = activated();
        let ctx = site.request_as("sam");
        let ed = site.principal("ed").unwrap();

        site.delete(&ctx, ed.id).unwrap();
        assert!(site.principal("ed").is_err());
    }

    #[test]
    fn administrator_deletes_administrator() {
        let site = activated();
        let ctx = site.request_as("root");
        let ops = site.principal("ops").unwrap();

        site.delete(&ctx, ops.id).unwrap();
        assert!(site.principal("ops").is_err());
    }

    // ── Screens ──────────────────────────────────────────────────────────────

    #[test]
    fn administrator_edit_screen_is_denied() {
        let site = activated();
        let root = site.principal("root").unwrap();
        let ctx = site.request_as("sam").with_param("user_id", root.id.to_string());

        let err = site.open_screen(&ctx, "user-edit").unwrap_err();
        assert!(err.is_access_denied());
    }

    #[test]
    fn editor_edit_screen_is_allowed() {
        let site = activated();
        let ed = site.principal("ed").unwrap();
        let ctx = site.request_as("sam").with_param("user_id", ed.id.to_string());

        site.open_screen(&ctx, "user-edit").unwrap();
    }

    #[test]
    fn appearance_screens_are_blocked_for_restricted_only() {
        let site = activated();
        let sam = site.request_as("sam");
        let root = site.request_as("root");

        for screen in ["themes", "customize", "widgets"] {
            assert!(site.open_screen(&sam, screen).unwrap_err().is_access_denied());
            site.open_screen(&root, screen).unwrap();
        }
        site.open_screen(&sam, "nav-menus").unwrap();
    }

    #[test]
    fn editable_roles_hide_administrator_from_restricted() {
        let site = activated();

        let for_sam = site.editable_roles(&site.request_as("sam")).unwrap();
        assert!(!for_sam.contains_key(&RoleId::administrator()));
        assert!(for_sam.contains_key(&RoleId::new("editor")));

        let for_root = site.editable_roles(&site.request_as("root")).unwrap();
        assert!(for_root.contains_key(&RoleId::administrator()));
    }

    // ── Privacy policy ───────────────────────────────────────────────────────

    #[test]
    fn privacy_page_grants_manage_options_for_that_page_only() {
        let site = activated();
        let ctx = site.request_as("sam");
        let sam = site.principal("sam").unwrap();

        assert!(site.user_can(&ctx, sam.id, "manage_options", Some(seed::PRIVACY_PAGE)).unwrap());
        assert!(!site.user_can(&ctx, sam.id, "manage_options", Some(8)).unwrap());
        assert!(!site.user_can(&ctx, sam.id, "manage_options", None).unwrap());
    }

    #[test]
    fn privacy_page_grant_does_not_apply_to_editor() {
        let site = activated();
        let ctx = site.request_as("ed");
        let ed = site.principal("ed").unwrap();

        assert!(!site.user_can(&ctx, ed.id, "manage_options", Some(seed::PRIVACY_PAGE)).unwrap());
    }

    #[test]
    fn unset_privacy_page_grants_nothing() {
        let site = activated();
        site.host.set_privacy_policy_page(TenantId::PRIMARY, None);
        let ctx = site.request_as("sam");
        let sam = site.principal("sam").unwrap();

        assert!(!site.user_can(&ctx, sam.id, "manage_options", Some(seed::PRIVACY_PAGE)).unwrap());
    }

    // ── Scenarios ────────────────────────────────────────────────────────────

    #[test]
    fn scenarios_run() {
        super::scenarios::provisioning::run_scenario().unwrap();
        super::scenarios::role_change::run_scenario().unwrap();
        super::scenarios::user_delete::run_scenario().unwrap();
        super::scenarios::screens::run_scenario().unwrap();
        super::scenarios::registration::run_scenario().unwrap();
        super::scenarios::privacy_policy::run_scenario().unwrap();
    }
}
