//! Scenario: deleting accounts.

use sitemgr_contracts::error::SiteResult;

use super::outcome;
use crate::{seed, site::Site};

pub fn run_scenario() -> SiteResult<()> {
    println!("=== Scenario: Account deletion ===");
    println!();

    let site = Site::stock(seed::single_site());
    site.activate()?;

    let as_sam = site.request_as("sam");
    let as_root = site.request_as("root");

    let ed = site.principal("ed")?;
    let ops = site.principal("ops")?;

    println!("  sam deletes ed (editor):         {}", outcome(&site.delete(&as_sam, ed.id)));
    println!("  sam deletes ops (administrator): {}", outcome(&site.delete(&as_sam, ops.id)));
    println!("  root deletes ops (administrator): {}", outcome(&site.delete(&as_root, ops.id)));
    println!();

    Ok(())
}
