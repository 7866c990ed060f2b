//! Shared in-memory host doubles for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sitemgr_contracts::{
    capability::CapabilitySet,
    error::{SiteManagerError, SiteResult},
    event::TenantId,
    principal::{Principal, PrincipalId},
    role::{Role, RoleId},
};
use sitemgr_core::traits::{PrincipalStore, RoleRegistry, SiteSettings, TenantDirectory};

pub fn principal(id: u64, login: &str, roles: &[&str]) -> Principal {
    Principal {
        id: PrincipalId(id),
        login: login.to_string(),
        email: format!("{login}@example.org"),
        roles: roles.iter().map(|r| RoleId::new(*r)).collect(),
    }
}

pub fn role(id: &str, caps: &[&str]) -> Role {
    Role {
        id: RoleId::new(id),
        label: id.to_string(),
        capabilities: caps.iter().map(|c| (*c, true)).collect::<CapabilitySet>(),
    }
}

// ── Principals ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryPrincipals {
    pub inner: Arc<Mutex<Vec<Principal>>>,
}

impl MemoryPrincipals {
    pub fn with(principals: Vec<Principal>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(principals)),
        }
    }

    pub fn roles_of(&self, id: u64) -> Vec<RoleId> {
        self.find_by_id(PrincipalId(id)).map(|p| p.roles).unwrap_or_default()
    }

    fn update(&self, id: PrincipalId, f: impl FnOnce(&mut Principal)) -> SiteResult<()> {
        let mut all = self.inner.lock().unwrap();
        match all.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                f(p);
                Ok(())
            }
            None => Err(SiteManagerError::HostError {
                reason: format!("no principal {id}"),
            }),
        }
    }
}

impl PrincipalStore for MemoryPrincipals {
    fn find_by_id(&self, id: PrincipalId) -> Option<Principal> {
        self.inner.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Principal> {
        self.inner.lock().unwrap().iter().find(|p| p.email == email).cloned()
    }

    fn find_by_login(&self, login: &str) -> Option<Principal> {
        self.inner.lock().unwrap().iter().find(|p| p.login == login).cloned()
    }

    fn set_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        self.update(id, |p| p.roles = vec![role.clone()])
    }

    fn add_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        self.update(id, |p| {
            if !p.roles.contains(role) {
                p.roles.push(role.clone());
            }
        })
    }

    fn remove_principal_role(&self, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        self.update(id, |p| p.roles.retain(|r| r != role))
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

pub struct FixedSettings {
    pub privacy_page: Option<u64>,
}

impl SiteSettings for FixedSettings {
    fn privacy_policy_page(&self, _tenant: TenantId) -> Option<u64> {
        self.privacy_page
    }
}

// ── Sites: per-tenant role registry plus tenant directory ───────────────────

struct SitesState {
    stack: Vec<TenantId>,
    roles: HashMap<TenantId, HashMap<RoleId, Role>>,
}

pub struct MemorySites {
    multi: bool,
    tenants: Vec<TenantId>,
    refuse: Option<TenantId>,
    state: Mutex<SitesState>,
}

impl MemorySites {
    pub fn single(roles: Vec<Role>) -> Self {
        Self::multi(vec![(TenantId::PRIMARY, roles)], None, false)
    }

    pub fn multi(sites: Vec<(TenantId, Vec<Role>)>, refuse: Option<TenantId>, multi: bool) -> Self {
        let tenants = sites.iter().map(|(t, _)| *t).collect();
        let roles = sites
            .into_iter()
            .map(|(t, roles)| (t, roles.into_iter().map(|r| (r.id.clone(), r)).collect::<HashMap<_, _>>()))
            .collect();
        Self {
            multi,
            tenants,
            refuse,
            state: Mutex::new(SitesState {
                stack: vec![TenantId::PRIMARY],
                roles,
            }),
        }
    }

    pub fn role_in(&self, tenant: TenantId, id: &str) -> Option<Role> {
        let state = self.state.lock().unwrap();
        state.roles.get(&tenant).and_then(|r| r.get(&RoleId::new(id)).cloned())
    }

    fn current(state: &SitesState) -> TenantId {
        state.stack.last().copied().unwrap_or(TenantId::PRIMARY)
    }
}

impl RoleRegistry for MemorySites {
    fn get_role(&self, id: &RoleId) -> Option<Role> {
        let state = self.state.lock().unwrap();
        state.roles.get(&Self::current(&state)).and_then(|r| r.get(id).cloned())
    }

    fn set_role(&self, role: Role) -> SiteResult<()> {
        let mut state = self.state.lock().unwrap();
        let tenant = Self::current(&state);
        state.roles.entry(tenant).or_default().insert(role.id.clone(), role);
        Ok(())
    }

    fn remove_role(&self, id: &RoleId) -> SiteResult<()> {
        let mut state = self.state.lock().unwrap();
        let tenant = Self::current(&state);
        if let Some(roles) = state.roles.get_mut(&tenant) {
            roles.remove(id);
        }
        Ok(())
    }
}

impl TenantDirectory for MemorySites {
    fn is_multi_tenant(&self) -> bool {
        self.multi
    }

    fn tenant_ids(&self) -> Vec<TenantId> {
        self.tenants.clone()
    }

    fn current_tenant(&self) -> TenantId {
        Self::current(&self.state.lock().unwrap())
    }

    fn switch_to(&self, tenant: TenantId) -> SiteResult<()> {
        if self.refuse == Some(tenant) {
            return Err(SiteManagerError::TenantSwitch {
                tenant: tenant.0,
                reason: "site is archived".to_string(),
            });
        }
        self.state.lock().unwrap().stack.push(tenant);
        Ok(())
    }

    fn restore(&self) {
        let mut state = self.state.lock().unwrap();
        if state.stack.len() > 1 {
            state.stack.pop();
        }
    }
}
