//! A single installation wired end to end.
//!
//! `Site` plays the host platform: it owns the dispatcher, performs the
//! platform's own writes, and emits the same events a real host would at the
//! same moments. Writes that the host commits before notifying (role change,
//! registration, profile update) happen before `emit`; deletion is vetoable
//! and only happens after `emit` succeeds.

use std::collections::BTreeMap;
use std::sync::Arc;

use sitemgr_contracts::{
    capability::{Capability, CapabilitySet},
    error::{SiteManagerError, SiteResult},
    event::{CapabilityCheck, Event, Screen},
    principal::{Principal, PrincipalId},
    role::RoleId,
};
use sitemgr_core::{
    traits::{PrincipalStore, RoleRegistry, TenantDirectory},
    Dispatcher, Filters, RequestContext,
};
use sitemgr_policy::{ActionGuard, ProvisionReport, RoleBuilder, SiteManagerConfig};

use crate::host::InMemoryHost;

pub struct Site {
    pub host: InMemoryHost,
    builder: RoleBuilder,
    dispatcher: Dispatcher,
}

impl Site {
    pub fn new(host: InMemoryHost, config: &SiteManagerConfig, filters: Filters) -> Self {
        let filters = Arc::new(filters);
        let builder = RoleBuilder::new(config, Arc::clone(&filters));
        let guard = Arc::new(ActionGuard::new(
            config,
            filters,
            Arc::new(host.clone()),
            Arc::new(host.clone()),
        ));

        let mut dispatcher = Dispatcher::new();
        guard.register(&mut dispatcher);

        Self { host, builder, dispatcher }
    }

    /// Default configuration, no filters.
    pub fn stock(host: InMemoryHost) -> Self {
        Self::new(host, &SiteManagerConfig::default(), Filters::new())
    }

    pub fn builder(&self) -> &RoleBuilder {
        &self.builder
    }

    /// Build the restricted role on every tenant.
    pub fn activate(&self) -> SiteResult<ProvisionReport> {
        self.builder.provision(&self.host, &self.host)
    }

    /// Start a request acting as `login`. Unknown logins act anonymously.
    pub fn request_as(&self, login: &str) -> RequestContext {
        RequestContext::new(self.host.current_tenant(), self.host.find_by_login(login))
    }

    pub fn principal(&self, login: &str) -> SiteResult<Principal> {
        self.host
            .find_by_login(login)
            .ok_or_else(|| SiteManagerError::HostError {
                reason: format!("no principal with login '{}'", login),
            })
    }

    pub fn open_screen(&self, ctx: &RequestContext, base: &str) -> SiteResult<()> {
        self.dispatcher
            .emit(ctx, Event::ScreenRendered { screen: Screen::new(base) })
            .map(|_| ())
    }

    /// Direct role mutation: the write is committed, then announced.
    pub fn change_role(&self, ctx: &RequestContext, id: PrincipalId, role: &RoleId) -> SiteResult<()> {
        let old_roles = self.principal_roles(id)?;
        self.host.set_principal_role(id, role)?;
        self.dispatcher
            .emit(
                ctx,
                Event::RoleChanged {
                    principal: id,
                    new_role: role.clone(),
                    old_roles,
                },
            )
            .map(|_| ())
    }

    /// Register a new account with `role`, then announce it.
    pub fn register(&self, ctx: &RequestContext, login: &str, role: &RoleId) -> SiteResult<Principal> {
        let principal =
            self.host
                .insert_principal(login, &format!("{login}@example.org"), &[role.as_str()]);
        self.dispatcher
            .emit(ctx, Event::PrincipalCreated { principal: principal.id })?;
        self.host
            .find_by_id(principal.id)
            .ok_or_else(|| SiteManagerError::HostError {
                reason: format!("principal {} vanished after registration", principal.id),
            })
    }

    /// Overwrite an account's roles from a profile form, then announce it.
    pub fn update_profile(&self, ctx: &RequestContext, id: PrincipalId, roles: &[RoleId]) -> SiteResult<()> {
        let (first, rest) = roles.split_first().ok_or_else(|| SiteManagerError::HostError {
            reason: "a profile must keep at least one role".to_string(),
        })?;
        self.host.set_principal_role(id, first)?;
        for role in rest {
            self.host.add_principal_role(id, role)?;
        }
        self.dispatcher
            .emit(ctx, Event::PrincipalUpdated { principal: id })
            .map(|_| ())
    }

    /// Ask, then delete. A veto leaves the account in place.
    pub fn delete(&self, ctx: &RequestContext, id: PrincipalId) -> SiteResult<()> {
        self.dispatcher.emit(ctx, Event::PrincipalDeleted { principal: id })?;
        self.host.delete_principal(id);
        Ok(())
    }

    /// The roles the acting principal may assign on the current tenant.
    pub fn editable_roles(&self, ctx: &RequestContext) -> SiteResult<BTreeMap<RoleId, String>> {
        match self.dispatcher.emit(
            ctx,
            Event::EditableRolesListed {
                roles: self.host.role_labels(),
            },
        )? {
            Event::EditableRolesListed { roles } => Ok(roles),
            other => Err(SiteManagerError::HostError {
                reason: format!("unexpected '{}' event from role listing", other.point()),
            }),
        }
    }

    /// Whether `id` holds `capability`, optionally on `object_id`.
    ///
    /// The role capabilities are the union of every assigned role on the
    /// current tenant; the capability-evaluation handlers may extend them for
    /// this check only.
    pub fn user_can(
        &self,
        ctx: &RequestContext,
        id: PrincipalId,
        capability: &str,
        object_id: Option<u64>,
    ) -> SiteResult<bool> {
        let Some(principal) = self.host.find_by_id(id) else {
            return Ok(false);
        };

        let mut granted = CapabilitySet::new();
        for role in &principal.roles {
            if let Some(registered) = self.host.get_role(role) {
                granted.merge(&registered.capabilities);
            }
        }

        let capability = Capability::new(capability);
        let event = Event::CapabilityEvaluated {
            check: CapabilityCheck {
                principal,
                granted,
                requested: vec![capability.clone()],
                object_id,
            },
        };

        match self.dispatcher.emit(ctx, event)? {
            Event::CapabilityEvaluated { check } => Ok(check.granted.has(&capability)),
            other => Err(SiteManagerError::HostError {
                reason: format!("unexpected '{}' event from capability check", other.point()),
            }),
        }
    }

    fn principal_roles(&self, id: PrincipalId) -> SiteResult<Vec<RoleId>> {
        self.host
            .find_by_id(id)
            .map(|p| p.roles)
            .ok_or_else(|| SiteManagerError::HostError {
                reason: format!("principal {} does not exist", id),
            })
    }
}
