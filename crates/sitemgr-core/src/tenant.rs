//! Scoped tenant switching.

use tracing::debug;

use sitemgr_contracts::{error::SiteResult, event::TenantId};

use crate::traits::TenantDirectory;

/// Restores the previous tenant when dropped, including on early return.
struct RestoreOnDrop<'a> {
    directory: &'a dyn TenantDirectory,
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        self.directory.restore();
    }
}

/// Run `f` with `tenant` as the current context, then restore the previous
/// context whether `f` succeeds or fails.
///
/// If the switch itself fails, `f` is not run and nothing is restored.
pub fn with_tenant<T, F>(directory: &dyn TenantDirectory, tenant: TenantId, f: F) -> SiteResult<T>
where
    F: FnOnce() -> SiteResult<T>,
{
    directory.switch_to(tenant)?;
    let _restore = RestoreOnDrop { directory };
    debug!(tenant = %tenant, "switched tenant context");
    f()
}
