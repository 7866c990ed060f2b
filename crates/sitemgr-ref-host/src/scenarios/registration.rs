//! Scenario: registering and updating accounts as administrator.

use sitemgr_contracts::{error::SiteResult, role::RoleId};

use crate::{seed, site::Site};

pub fn run_scenario() -> SiteResult<()> {
    println!("=== Scenario: Registration and profile update ===");
    println!();

    let site = Site::stock(seed::single_site());
    site.activate()?;

    let sam = site.request_as("sam");
    let created = site.register(&sam, "mallory", &RoleId::administrator())?;
    println!("  sam registers mallory as administrator");
    println!("  mallory roles:          {:?}", created.roles);

    let ana = site.principal("ana")?;
    site.update_profile(&sam, ana.id, &[RoleId::administrator()])?;
    println!("  sam promotes ana to administrator via profile");
    println!("  ana roles:              {:?}", site.principal("ana")?.roles);

    let root = site.request_as("root");
    let trusted = site.register(&root, "trent", &RoleId::administrator())?;
    println!("  root registers trent as administrator");
    println!("  trent roles:            {:?}", trusted.roles);
    println!();

    Ok(())
}
