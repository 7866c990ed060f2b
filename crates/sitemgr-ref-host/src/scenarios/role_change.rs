//! Scenario: direct role mutation on an administrator.

use sitemgr_contracts::{error::SiteResult, role::RoleId};

use super::outcome;
use crate::{seed, site::Site};

pub fn run_scenario() -> SiteResult<()> {
    println!("=== Scenario: Direct role change ===");
    println!();

    let site = Site::stock(seed::single_site());
    site.activate()?;

    let ctx = site.request_as("sam");
    let root = site.principal("root")?;
    let ed = site.principal("ed")?;

    let demote_admin = site.change_role(&ctx, root.id, &RoleId::new(RoleId::SITE_MANAGER));
    println!("  sam demotes root:        {}", outcome(&demote_admin));
    println!("  root roles afterwards:   {:?}", site.principal("root")?.roles);

    let promote_editor = site.change_role(&ctx, ed.id, &RoleId::new("author"));
    println!("  sam changes ed:          {}", outcome(&promote_editor));
    println!("  ed roles afterwards:     {:?}", site.principal("ed")?.roles);

    let sam = site.principal("sam")?;
    let self_promotion = site.change_role(&ctx, sam.id, &RoleId::administrator());
    println!("  sam promotes itself:     {}", outcome(&self_promotion));
    println!("  sam roles afterwards:    {:?}", site.principal("sam")?.roles);
    println!();

    Ok(())
}
