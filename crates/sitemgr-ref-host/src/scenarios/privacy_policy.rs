//! Scenario: editing the privacy-policy page.

use sitemgr_contracts::error::SiteResult;

use crate::{seed, site::Site};

pub fn run_scenario() -> SiteResult<()> {
    println!("=== Scenario: Privacy policy page ===");
    println!();

    let site = Site::stock(seed::single_site());
    site.activate()?;

    let ctx = site.request_as("sam");
    let sam = site.principal("sam")?;

    for (label, page) in [("privacy page", Some(seed::PRIVACY_PAGE)), ("other page", Some(8)), ("no page", None)] {
        println!(
            "  manage_options on {:<13} {}",
            format!("{label}:"),
            site.user_can(&ctx, sam.id, "manage_options", page)?
        );
    }
    println!();

    Ok(())
}
