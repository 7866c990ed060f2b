//! Declarative capability bundle table.
//!
//! Each bundle is a fixed list of capability grants layered on top of the
//! base role when the corresponding flag is enabled. Per-post-type grants
//! are expanded from templates once, on first access.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use sitemgr_contracts::capability::{Capability, CapabilitySet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleKind {
    Users,
    Theme,
    PrivacyPolicy,
    GravityForms,
    WooCommerce,
    Yoast,
}

impl BundleKind {
    pub const ALL: [BundleKind; 6] = [
        BundleKind::Users,
        BundleKind::Theme,
        BundleKind::PrivacyPolicy,
        BundleKind::GravityForms,
        BundleKind::WooCommerce,
        BundleKind::Yoast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BundleKind::Users => "users",
            BundleKind::Theme => "theme",
            BundleKind::PrivacyPolicy => "privacy_policy",
            BundleKind::GravityForms => "gravity_forms",
            BundleKind::WooCommerce => "woocommerce",
            BundleKind::Yoast => "yoast",
        }
    }
}

/// Granted in addition to the users bundle on multi-site installations.
pub const NETWORK_USERS: &str = "manage_network_users";

const USERS: &[&str] = &[
    "create_users",
    "delete_users",
    "edit_users",
    "list_users",
    "promote_users",
    "remove_users",
];

const THEME: &[&str] = &["edit_theme_options"];

const GRAVITY_FORMS: &[&str] = &[
    "gravityforms_create_form",
    "gravityforms_delete_forms",
    "gravityforms_edit_forms",
    "gravityforms_preview_forms",
    "gravityforms_view_entries",
    "gravityforms_edit_entries",
    "gravityforms_delete_entries",
    "gravityforms_view_entry_notes",
    "gravityforms_edit_entry_notes",
    "gravityforms_export_entries",
];

const YOAST: &[&str] = &[
    "wpseo_bulk_edit",
    "wpseo_edit_advanced_metadata",
    "wpseo_manage_options",
    "wpseo_manage_redirects",
];

const SHOP_POST_TYPES: &[&str] = &["product", "shop_order", "shop_coupon"];

/// `{t}` is replaced with each shop post type.
const SHOP_TEMPLATES: &[&str] = &[
    "edit_{t}",
    "read_{t}",
    "delete_{t}",
    "edit_{t}s",
    "edit_others_{t}s",
    "publish_{t}s",
    "read_private_{t}s",
    "delete_{t}s",
    "delete_private_{t}s",
    "delete_published_{t}s",
    "delete_others_{t}s",
    "edit_private_{t}s",
    "edit_published_{t}s",
    "manage_{t}_terms",
    "edit_{t}_terms",
    "delete_{t}_terms",
    "assign_{t}_terms",
];

const SHOP_SETTINGS: &[&str] = &["manage_woocommerce", "view_woocommerce_reports"];

fn grants<'a>(names: impl IntoIterator<Item = &'a str>) -> CapabilitySet {
    names.into_iter().map(|name| (name, true)).collect()
}

static TABLE: Lazy<Vec<(BundleKind, CapabilitySet)>> = Lazy::new(|| {
    let shop_types = SHOP_POST_TYPES.iter().flat_map(|post_type| {
        SHOP_TEMPLATES
            .iter()
            .map(move |template| template.replace("{t}", post_type))
    });
    let mut woocommerce: CapabilitySet = shop_types.map(|name| (name, true)).collect();
    woocommerce.merge(&grants(SHOP_SETTINGS.iter().copied()));

    vec![
        (BundleKind::Users, grants(USERS.iter().copied())),
        (BundleKind::Theme, grants(THEME.iter().copied())),
        (BundleKind::PrivacyPolicy, CapabilitySet::new()),
        (BundleKind::GravityForms, grants(GRAVITY_FORMS.iter().copied())),
        (BundleKind::WooCommerce, woocommerce),
        (BundleKind::Yoast, grants(YOAST.iter().copied())),
    ]
});

/// The fixed grants of `kind`.
///
/// The privacy-policy bundle has no static grants; enabling it turns on the
/// per-check capability injection in the action guard instead.
pub fn capabilities(kind: BundleKind) -> &'static CapabilitySet {
    static EMPTY: Lazy<CapabilitySet> = Lazy::new(CapabilitySet::new);
    TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, caps)| caps)
        .unwrap_or(&EMPTY)
}

/// The union of every bundle in `kinds`, with the network user grant added
/// to the users bundle when `multi_tenant` is set.
pub fn merged(kinds: &[BundleKind], multi_tenant: bool) -> CapabilitySet {
    let mut caps = CapabilitySet::new();
    for kind in kinds {
        caps.merge(capabilities(*kind));
        if *kind == BundleKind::Users && multi_tenant {
            caps.grant(Capability::new(NETWORK_USERS));
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use sitemgr_contracts::capability::Capability;

    use super::{capabilities, merged, BundleKind, NETWORK_USERS};

    fn has(kind: BundleKind, name: &str) -> bool {
        capabilities(kind).has(&Capability::new(name))
    }

    #[test]
    fn users_bundle_has_the_six_user_grants() {
        let users = capabilities(BundleKind::Users);
        assert_eq!(users.len(), 6);
        for name in [
            "create_users",
            "delete_users",
            "edit_users",
            "list_users",
            "promote_users",
            "remove_users",
        ] {
            assert!(users.has(&Capability::new(name)), "missing {name}");
        }
        assert!(!has(BundleKind::Users, NETWORK_USERS));
    }

    #[test]
    fn woocommerce_bundle_is_expanded_per_post_type() {
        let shop = capabilities(BundleKind::WooCommerce);
        // 17 templates for each of 3 post types, plus two settings grants.
        assert_eq!(shop.len(), 17 * 3 + 2);
        assert!(has(BundleKind::WooCommerce, "edit_others_shop_orders"));
        assert!(has(BundleKind::WooCommerce, "assign_product_terms"));
        assert!(has(BundleKind::WooCommerce, "read_private_shop_coupons"));
        assert!(has(BundleKind::WooCommerce, "view_woocommerce_reports"));
    }

    #[test]
    fn privacy_policy_bundle_has_no_static_grants() {
        assert!(capabilities(BundleKind::PrivacyPolicy).is_empty());
    }

    #[test]
    fn every_grant_is_true() {
        for kind in BundleKind::ALL {
            assert!(capabilities(kind).iter().all(|(_, value)| value), "{}", kind.name());
        }
    }

    #[test]
    fn merged_adds_network_users_only_for_multi_tenant() {
        let single = merged(&[BundleKind::Users, BundleKind::Theme], false);
        assert!(!single.has(&Capability::new(NETWORK_USERS)));
        assert_eq!(single.len(), 7);

        let multi = merged(&[BundleKind::Users], true);
        assert!(multi.has(&Capability::new(NETWORK_USERS)));

        // Without the users bundle there is no network grant either.
        let theme_only = merged(&[BundleKind::Theme], true);
        assert!(!theme_only.has(&Capability::new(NETWORK_USERS)));
    }
}
