//! Seed data for the reference host.
//!
//! Roles mirror the stock roles of a typical content-management install.
//! All accounts are fictional.

use sitemgr_contracts::{
    capability::CapabilitySet,
    event::TenantId,
    role::{Role, RoleId},
};

use crate::host::InMemoryHost;

/// Page id of the privacy-policy page on every seeded tenant.
pub const PRIVACY_PAGE: u64 = 3;

const EDITOR: &[&str] = &[
    "moderate_comments",
    "manage_categories",
    "manage_links",
    "upload_files",
    "unfiltered_html",
    "edit_posts",
    "edit_others_posts",
    "edit_published_posts",
    "publish_posts",
    "edit_pages",
    "read",
    "edit_others_pages",
    "edit_published_pages",
    "publish_pages",
    "delete_pages",
    "delete_others_pages",
    "delete_published_pages",
    "delete_posts",
    "delete_others_posts",
    "delete_published_posts",
    "delete_private_posts",
    "edit_private_posts",
    "read_private_posts",
    "delete_private_pages",
    "edit_private_pages",
    "read_private_pages",
];

const ADMINISTRATOR_EXTRA: &[&str] = &[
    "switch_themes",
    "edit_themes",
    "activate_plugins",
    "edit_plugins",
    "edit_users",
    "edit_files",
    "manage_options",
    "import",
    "list_users",
    "remove_users",
    "promote_users",
    "edit_theme_options",
    "delete_themes",
    "export",
    "create_users",
    "delete_users",
    "install_themes",
    "install_plugins",
    "update_core",
];

const AUTHOR: &[&str] = &[
    "upload_files",
    "edit_posts",
    "edit_published_posts",
    "publish_posts",
    "read",
    "delete_posts",
    "delete_published_posts",
];

fn role(id: &str, label: &str, caps: impl IntoIterator<Item = &'static str>) -> Role {
    Role {
        id: RoleId::new(id),
        label: label.to_string(),
        capabilities: caps.into_iter().map(|c| (c, true)).collect::<CapabilitySet>(),
    }
}

pub fn editor() -> Role {
    role("editor", "Editor", EDITOR.iter().copied())
}

pub fn administrator() -> Role {
    role(
        RoleId::ADMINISTRATOR,
        "Administrator",
        EDITOR.iter().chain(ADMINISTRATOR_EXTRA).copied(),
    )
}

pub fn author() -> Role {
    role("author", "Author", AUTHOR.iter().copied())
}

pub fn subscriber() -> Role {
    role("subscriber", "Subscriber", ["read"])
}

pub fn stock_roles() -> Vec<Role> {
    vec![administrator(), editor(), author(), subscriber()]
}

/// The accounts every seeded host starts with, as (login, role).
pub const ACCOUNTS: &[(&str, &str)] = &[
    ("root", RoleId::ADMINISTRATOR),
    ("ops", RoleId::ADMINISTRATOR),
    ("sam", RoleId::SITE_MANAGER),
    ("ed", "editor"),
    ("ana", "author"),
];

fn seed_accounts(host: &InMemoryHost) {
    for (login, role) in ACCOUNTS {
        host.insert_principal(login, &format!("{login}@example.org"), &[*role]);
    }
}

/// A single-site host with the stock roles, seeded accounts and a privacy page.
pub fn single_site() -> InMemoryHost {
    let host = InMemoryHost::single_site(stock_roles());
    host.set_privacy_policy_page(TenantId::PRIMARY, Some(PRIVACY_PAGE));
    seed_accounts(&host);
    host
}

/// A multi-site host with `sites` tenants. Tenant ids listed in `bare`
/// carry no editor role.
pub fn network(sites: u64, bare: &[u64]) -> InMemoryHost {
    let tenants = (1..=sites)
        .map(|id| {
            let roles = if bare.contains(&id) {
                vec![administrator(), subscriber()]
            } else {
                stock_roles()
            };
            (TenantId(id), roles)
        })
        .collect();
    let host = InMemoryHost::network(tenants, true);
    for id in 1..=sites {
        host.set_privacy_policy_page(TenantId(id), Some(PRIVACY_PAGE));
    }
    seed_accounts(&host);
    host
}
