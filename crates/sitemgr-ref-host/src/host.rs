//! In-memory implementation of every host trait.
//!
//! `InMemoryHost` is the reference host. It keeps all tenants, their role
//! registries and the principal store in one `Mutex`-protected state, so
//! clones of the host share the same data and can be handed out as
//! `Arc<dyn PrincipalStore>` and friends.
//!
//! Role registries are per tenant and follow the current tenant context;
//! principals are installation-wide.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use sitemgr_contracts::{
    error::{SiteManagerError, SiteResult},
    event::TenantId,
    principal::{Principal, PrincipalId},
    role::{Role, RoleId},
};
use sitemgr_core::traits::{PrincipalStore, RoleRegistry, SiteSettings, TenantDirectory};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct TenantState {
    pub(crate) roles: BTreeMap<RoleId, Role>,
    pub(crate) privacy_page: Option<u64>,
}

pub(crate) struct HostState {
    pub(crate) multi_tenant: bool,
    pub(crate) tenants: BTreeMap<TenantId, TenantState>,
    /// Tenants that refuse a context switch (archived sites).
    pub(crate) archived: BTreeSet<TenantId>,
    /// Switched tenant contexts; the last entry is current.
    pub(crate) stack: Vec<TenantId>,
    pub(crate) principals: BTreeMap<PrincipalId, Principal>,
    pub(crate) next_principal: u64,
}

impl HostState {
    fn current(&self) -> TenantId {
        self.stack.last().copied().unwrap_or(TenantId::PRIMARY)
    }
}

// ── Public host ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InMemoryHost {
    pub(crate) state: Arc<Mutex<HostState>>,
}

impl InMemoryHost {
    /// A single-site host with the given roles registered on the primary tenant.
    pub fn single_site(roles: Vec<Role>) -> Self {
        Self::network(vec![(TenantId::PRIMARY, roles)], false)
    }

    /// A host with one role registry per tenant.
    pub fn network(sites: Vec<(TenantId, Vec<Role>)>, multi_tenant: bool) -> Self {
        let tenants = sites
            .into_iter()
            .map(|(tenant, roles)| {
                let roles = roles.into_iter().map(|r| (r.id.clone(), r)).collect();
                (tenant, TenantState { roles, privacy_page: None })
            })
            .collect();
        let state = HostState {
            multi_tenant,
            tenants,
            archived: BTreeSet::new(),
            stack: vec![TenantId::PRIMARY],
            principals: BTreeMap::new(),
            next_principal: 1,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().expect("host state lock poisoned")
    }

    /// Insert a principal with the next free id and return it.
    pub fn insert_principal(&self, login: &str, email: &str, roles: &[&str]) -> Principal {
        let mut state = self.lock();
        let id = PrincipalId(state.next_principal);
        state.next_principal += 1;
        let principal = Principal {
            id,
            login: login.to_string(),
            email: email.to_string(),
            roles: roles.iter().map(|r| RoleId::new(*r)).collect(),
        };
        state.principals.insert(id, principal.clone());
        principal
    }

    pub fn delete_principal(&self, id: PrincipalId) -> Option<Principal> {
        self.lock().principals.remove(&id)
    }

    pub fn set_privacy_policy_page(&self, tenant: TenantId, page: Option<u64>) {
        self.lock().tenants.entry(tenant).or_default().privacy_page = page;
    }

    pub fn archive(&self, tenant: TenantId) {
        self.lock().archived.insert(tenant);
    }

    /// Every role registered on the current tenant, id to label.
    pub fn role_labels(&self) -> BTreeMap<RoleId, String> {
        let state = self.lock();
        state
            .tenants
            .get(&state.current())
            .map(|t| t.roles.values().map(|r| (r.id.clone(), r.label.clone())).collect())
            .unwrap_or_default()
    }

    /// A role as registered on a specific tenant, regardless of context.
    pub fn role_on(&self, tenant: TenantId, id: &RoleId) -> Option<Role> {
        self.lock().tenants.get(&tenant).and_then(|t| t.roles.get(id).cloned())
    }

    fn update_principal(
        &self,
        id: PrincipalId,
        f: impl FnOnce(&mut Principal),
    ) -> SiteResult<()> {
        let mut state = self.lock();
        let principal = state
            .principals
            .get_mut(&id)
            .ok_or_else(|| SiteManagerError::HostError {
                reason: format!("principal {} does not exist", id),
            })?;
        f(&mut *principal);
        debug!(principal = %id, roles = ?principal.roles, "principal roles updated");
        Ok(())
    }
}

impl RoleRegistry for InMemoryHost {
    fn get_role(&self, id: &RoleId) -> Option<Role> {
        let state = self.lock();
        state.tenants.get(&state.current()).and_then(|t| t.roles.get(id).cloned())
    }

    fn set_role(&self, role: Role) -> SiteResult<()> {
        let mut state = self.lock();
        let tenant = state.current();
        state
            .tenants
            .entry(tenant)
            .or_default()
            .roles
            .insert(role.id.clone(), role);
        Ok(())
    }

    fn remove_role(&self, id: &RoleId) -> SiteResult<()> {
        let mut state = self.lock();
        let tenant = state.current();
        if let Some(t) = state.tenants.get_mut(&tenant) {
            t.roles.remove(id);
        }
        Ok(())
    }
}

impl PrincipalStore for InMemoryHost {
    fn find_by_id(&self, id: PrincipalId) -> Option<Principal> {
        self.lock().principals.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Principal> {
        self.lock()
            .principals
            .values()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn find_by_login(&self, login: &str) -> Option<Principal> {
        self.lock().principals.values().find(|p| p.login == login).cloned()
    }

    fn set_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        self.update_principal(id, |p| p.roles = vec![role.clone()])
    }

    fn add_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        self.update_principal(id, |p| {
            if !p.roles.contains(role) {
                p.roles.push(role.clone());
            }
        })
    }

    fn remove_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        self.update_principal(id, |p| p.roles.retain(|r| r != role))
    }
}

impl SiteSettings for InMemoryHost {
    fn privacy_policy_page(&self, tenant: TenantId) -> Option<u64> {
        self.lock().tenants.get(&tenant).and_then(|t| t.privacy_page)
    }
}

impl TenantDirectory for InMemoryHost {
    fn is_multi_tenant(&self) -> bool {
        self.lock().multi_tenant
    }

    fn tenant_ids(&self) -> Vec<TenantId> {
        self.lock().tenants.keys().copied().collect()
    }

    fn current_tenant(&self) -> TenantId {
        self.lock().current()
    }

    fn switch_to(&self, tenant: TenantId) -> SiteResult<()> {
        let mut state = self.lock();
        if !state.tenants.contains_key(&tenant) {
            return Err(SiteManagerError::TenantSwitch {
                tenant: tenant.0,
                reason: "no such site".to_string(),
            });
        }
        if state.archived.contains(&tenant) {
            return Err(SiteManagerError::TenantSwitch {
                tenant: tenant.0,
                reason: "site is archived".to_string(),
            });
        }
        state.stack.push(tenant);
        Ok(())
    }

    fn restore(&self) {
        let mut state = self.lock();
        if state.stack.len() > 1 {
            state.stack.pop();
        }
    }
}
