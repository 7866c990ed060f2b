//! Role capability builder.
//!
//! The restricted role is always recomputed in full:
//!
//! 1. Snapshot the base role's capability mapping from the registry.
//! 2. Merge every enabled bundle on top (bundle entries win on collision).
//! 3. Pass the merged mapping through the `Capabilities` filter chain.
//! 4. Replace the registration: remove the role, then add the new one.
//!
//! Any manual customization of the restricted role in the registry is lost
//! on rebuild. Permissions already evaluated in an in-flight request are not
//! revoked; later checks see the new mapping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use sitemgr_contracts::{
    error::{SiteManagerError, SiteResult},
    event::TenantId,
    role::{Role, RoleId},
};
use sitemgr_core::{
    traits::{RoleRegistry, TenantDirectory},
    with_tenant, Filters, TextFilter,
};

use crate::{
    bundle::{self, BundleKind},
    config::{BundleFlags, SiteManagerConfig},
};

/// What happened when the role was provisioned on one tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The role was (re)registered with this definition.
    Built(Role),
    /// The base role does not exist on this tenant; nothing was written.
    Skipped { base_role: RoleId },
}

/// Summary of a provisioning run across every tenant.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub role: RoleId,
    pub rebuilt: Vec<TenantId>,
    pub skipped: Vec<TenantId>,
    pub completed_at: DateTime<Utc>,
}

pub struct RoleBuilder {
    role: RoleId,
    label: String,
    base_role: String,
    bundles: BundleFlags,
    filters: Arc<Filters>,
}

impl RoleBuilder {
    /// The role id and label are fixed here; the base role name and the
    /// bundle set are evaluated on every build.
    pub fn new(config: &SiteManagerConfig, filters: Arc<Filters>) -> Self {
        let role = RoleId::new(filters.apply_text(TextFilter::RoleName, config.role_name.as_str()));
        let label = filters.apply_text(TextFilter::RoleLabel, config.role_label.as_str());
        Self {
            role,
            label,
            base_role: config.base_role.clone(),
            bundles: config.bundles,
            filters,
        }
    }

    pub fn role_id(&self) -> &RoleId {
        &self.role
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The base role name after the `BaseRole` filter chain.
    pub fn base_role(&self) -> RoleId {
        RoleId::new(self.filters.apply_text(TextFilter::BaseRole, self.base_role.as_str()))
    }

    /// The role id after the `RoleName` filter chain must still name a role
    /// the builder may overwrite: not empty, not the administrator role.
    pub fn check_role_id(&self) -> SiteResult<()> {
        if self.role.as_str().trim().is_empty() {
            return Err(SiteManagerError::ConfigError {
                reason: "filtered role name is empty".to_string(),
            });
        }
        if self.role.is_administrator() {
            return Err(SiteManagerError::ConfigError {
                reason: format!("filtered role name must not be '{}'", RoleId::ADMINISTRATOR),
            });
        }
        Ok(())
    }

    pub fn enabled_bundles(&self) -> Vec<BundleKind> {
        self.bundles.enabled()
    }

    /// Compute the restricted role from `base_role` and `bundles` without
    /// writing anything. Returns `None` if the base role is not registered.
    pub fn build_role(
        &self,
        registry: &dyn RoleRegistry,
        base_role: &RoleId,
        bundles: &[BundleKind],
        multi_tenant: bool,
    ) -> Option<Role> {
        let base = registry.get_role(base_role)?;

        let mut capabilities = base.capabilities;
        capabilities.merge(&bundle::merged(bundles, multi_tenant));
        let capabilities = self.filters.apply_capabilities(capabilities);

        debug!(
            role = %self.role,
            base_role = %base_role,
            bundles = bundles.len(),
            capabilities = capabilities.len(),
            "built restricted role"
        );

        Some(Role {
            id: self.role.clone(),
            label: self.label.clone(),
            capabilities,
        })
    }

    /// Build the role on the current tenant and replace its registration.
    pub fn provision_current(
        &self,
        registry: &dyn RoleRegistry,
        multi_tenant: bool,
    ) -> SiteResult<ProvisionOutcome> {
        self.check_role_id()?;
        let base_role = self.base_role();
        let bundles = self.enabled_bundles();

        let Some(role) = self.build_role(registry, &base_role, &bundles, multi_tenant) else {
            warn!(
                role = %self.role,
                base_role = %base_role,
                "base role not registered; restricted role left unchanged"
            );
            return Ok(ProvisionOutcome::Skipped { base_role });
        };

        registry.remove_role(&self.role)?;
        registry.set_role(role.clone())?;

        info!(
            role = %role.id,
            base_role = %base_role,
            capabilities = role.capabilities.len(),
            "restricted role provisioned"
        );

        Ok(ProvisionOutcome::Built(role))
    }

    /// Provision the role on every tenant of the installation.
    ///
    /// On a single-site host this builds once on the current tenant. On a
    /// multi-site host each tenant is built inside its own context switch;
    /// tenants without the base role are skipped. A failed switch stops the
    /// run and is returned: tenants already rebuilt stay rebuilt.
    pub fn provision(
        &self,
        registry: &dyn RoleRegistry,
        tenants: &dyn TenantDirectory,
    ) -> SiteResult<ProvisionReport> {
        self.check_role_id()?;

        let mut report = ProvisionReport {
            role: self.role.clone(),
            rebuilt: vec![],
            skipped: vec![],
            completed_at: Utc::now(),
        };

        if !tenants.is_multi_tenant() {
            let tenant = tenants.current_tenant();
            match self.provision_current(registry, false)? {
                ProvisionOutcome::Built(_) => report.rebuilt.push(tenant),
                ProvisionOutcome::Skipped { .. } => report.skipped.push(tenant),
            }
            report.completed_at = Utc::now();
            return Ok(report);
        }

        for tenant in tenants.tenant_ids() {
            let outcome = with_tenant(tenants, tenant, || self.provision_current(registry, true))?;
            match outcome {
                ProvisionOutcome::Built(_) => report.rebuilt.push(tenant),
                ProvisionOutcome::Skipped { .. } => report.skipped.push(tenant),
            }
        }

        info!(
            role = %self.role,
            rebuilt = report.rebuilt.len(),
            skipped = report.skipped.len(),
            "restricted role provisioned across tenants"
        );

        report.completed_at = Utc::now();
        Ok(report)
    }
}
