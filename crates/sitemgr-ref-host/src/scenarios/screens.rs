//! Scenario: opening user and appearance screens.

use sitemgr_contracts::error::SiteResult;

use super::outcome;
use crate::{seed, site::Site};

pub fn run_scenario() -> SiteResult<()> {
    println!("=== Scenario: Admin screens ===");
    println!();

    let site = Site::stock(seed::single_site());
    site.activate()?;

    let root = site.principal("root")?;
    let ed = site.principal("ed")?;

    let edit_root = site.request_as("sam").with_param("user_id", root.id.to_string());
    let edit_ed = site.request_as("sam").with_param("user_id", ed.id.to_string());

    println!("  sam opens user-edit for root: {}", outcome(&site.open_screen(&edit_root, "user-edit")));
    println!("  sam opens user-edit for ed:   {}", outcome(&site.open_screen(&edit_ed, "user-edit")));

    let sam = site.request_as("sam");
    let admin = site.request_as("root");
    for screen in ["themes", "widgets", "customize", "nav-menus"] {
        println!(
            "  {:<10} sam: {:<22} root: {}",
            screen,
            outcome(&site.open_screen(&sam, screen)),
            outcome(&site.open_screen(&admin, screen))
        );
    }

    let roles = site.editable_roles(&sam)?;
    println!("  Roles sam may assign:   {:?}", roles.keys().collect::<Vec<_>>());
    println!();

    Ok(())
}
