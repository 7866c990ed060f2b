//! Scenario: provisioning the role on a single site and on a network.

use sitemgr_contracts::{capability::Capability, error::SiteResult, event::TenantId};
use sitemgr_core::traits::RoleRegistry;
use sitemgr_policy::bundle::NETWORK_USERS;

use crate::{seed, site::Site};

pub fn run_scenario() -> SiteResult<()> {
    println!("=== Scenario: Role provisioning ===");
    println!();

    {
        let site = Site::stock(seed::single_site());
        let report = site.activate()?;
        let granted = site
            .host
            .get_role(site.builder().role_id())
            .map(|r| r.capabilities.len())
            .unwrap_or(0);

        println!("  Single site");
        println!("  Rebuilt tenants:        {:?}", report.rebuilt);
        println!("  Capabilities granted:   {}", granted);
        println!();
    }

    {
        let site = Site::stock(seed::network(4, &[3]));
        site.host.archive(TenantId(4));
        let result = site.activate();

        println!("  Network of 4 (site 3 has no editor role, site 4 archived)");
        match result {
            Ok(report) => {
                println!("  Rebuilt tenants:        {:?}", report.rebuilt);
                println!("  Skipped tenants:        {:?}", report.skipped);
            }
            Err(e) => {
                println!("  Stopped early:          {}", e);
            }
        }

        let network_users = Capability::new(NETWORK_USERS);
        for tenant in 1..=4 {
            let held = site
                .host
                .role_on(TenantId(tenant), site.builder().role_id())
                .map(|r| r.capabilities.has(&network_users));
            println!("  Site {} manage_network_users: {:?}", tenant, held);
        }
        println!();
    }

    Ok(())
}
