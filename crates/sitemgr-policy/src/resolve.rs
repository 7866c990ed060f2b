//! Principal resolution.
//!
//! Every guard names the principal it inspects with a `PrincipalRef`. A miss
//! at any lookup path resolves to `None`, which the guards read as "holds no
//! role": the condition is not met and the guard does not trigger.

use sitemgr_contracts::{
    principal::{Principal, PrincipalRef},
    role::RoleId,
};
use sitemgr_core::{traits::PrincipalStore, RequestContext};

/// Resolve `who` to a principal, or `None` if no lookup path matches.
pub fn resolve(
    store: &dyn PrincipalStore,
    ctx: &RequestContext,
    who: &PrincipalRef,
) -> Option<Principal> {
    match who {
        PrincipalRef::Current => ctx.current_principal().cloned(),
        PrincipalRef::Resolved(principal) => Some(principal.clone()),
        PrincipalRef::ById(id) => store.find_by_id(*id),
        PrincipalRef::ByEmail(email) => store.find_by_email(email),
        PrincipalRef::ByLogin(login) => store.find_by_login(login),
    }
}

/// The authoritative (first) role of `who`.
pub fn role_of(store: &dyn PrincipalStore, ctx: &RequestContext, who: &PrincipalRef) -> Option<RoleId> {
    resolve(store, ctx, who).and_then(|p| p.primary_role().cloned())
}
