//! Host trait definitions.
//!
//! The gate never owns roles or principals. Everything it reads or writes
//! goes through one of these traits, implemented by the host platform:
//!
//! - `RoleRegistry`: role definitions for the current tenant
//! - `PrincipalStore`: user accounts and their role assignments
//! - `SiteSettings`: per-tenant options the guards consult
//! - `TenantDirectory`: multi-site enumeration and context switching
//!
//! All methods take `&self`; implementations serialize their own writes.

use sitemgr_contracts::{
    error::SiteResult,
    event::TenantId,
    principal::{Principal, PrincipalId},
    role::{Role, RoleId},
};

/// The host's role registry, scoped to the tenant currently selected by the
/// `TenantDirectory`.
pub trait RoleRegistry: Send + Sync {
    /// Return a snapshot of the role, or `None` if it is not registered.
    fn get_role(&self, id: &RoleId) -> Option<Role>;

    /// Register `role`, overwriting any registration under the same id.
    fn set_role(&self, role: Role) -> SiteResult<()>;

    /// Remove the role registration. Removing an absent role is not an error.
    fn remove_role(&self, id: &RoleId) -> SiteResult<()>;
}

/// The host's principal store.
///
/// Lookups return `None` on a miss; the gate treats a miss as "no role".
pub trait PrincipalStore: Send + Sync {
    fn find_by_id(&self, id: PrincipalId) -> Option<Principal>;

    fn find_by_email(&self, email: &str) -> Option<Principal>;

    fn find_by_login(&self, login: &str) -> Option<Principal>;

    /// Replace the principal's whole role assignment with `role`.
    fn set_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()>;

    /// Append `role` to the principal's assignment if it is not present.
    fn add_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()>;

    /// Remove `role` from the principal's assignment if it is present.
    fn remove_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()>;
}

/// Per-tenant site options.
pub trait SiteSettings: Send + Sync {
    /// The page id designated as the privacy-policy page, if one is set.
    fn privacy_policy_page(&self, tenant: TenantId) -> Option<u64>;
}

/// Tenant enumeration and context switching for multi-site installations.
///
/// A single-site host reports `is_multi_tenant() == false` and is never
/// asked to switch.
pub trait TenantDirectory: Send + Sync {
    fn is_multi_tenant(&self) -> bool;

    /// Every tenant id in the installation, in host order.
    fn tenant_ids(&self) -> Vec<TenantId>;

    fn current_tenant(&self) -> TenantId;

    /// Make `tenant` the current context. Must be paired with `restore()`.
    fn switch_to(&self, tenant: TenantId) -> SiteResult<()>;

    /// Return to the context that was current before the last `switch_to()`.
    fn restore(&self);
}
