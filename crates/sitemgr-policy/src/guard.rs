//! Action guard: vetoes and corrections the capability model cannot express.
//!
//! The restricted role holds `edit_users`, `delete_users` and friends, which
//! would let it act on administrators. Each interception point below closes
//! one of those paths:
//!
//! | Event                  | Triggers when                                   | Effect            |
//! |------------------------|-------------------------------------------------|-------------------|
//! | editable roles listed  | actor is restricted                             | drop admin entry  |
//! | role changed           | actor not admin, previous role was admin        | revert, deny      |
//! | role changed           | actor restricted, new role is admin             | revert, deny      |
//! | user screen rendered   | actor restricted, target user is admin          | deny              |
//! | theme screen rendered  | actor restricted, screen is blocked             | deny              |
//! | principal created/upd. | actor restricted, principal is now admin        | demote silently   |
//! | principal deleted      | actor restricted, target is admin               | deny              |
//! | capability evaluated   | checked principal restricted, privacy page edit | inject grants     |
//!
//! Denials are terminal `AccessDenied` errors. Creation and update have
//! already been committed by the host when the event fires, so they are
//! corrected in place instead of denied.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use sitemgr_contracts::{
    error::{SiteManagerError, SiteResult},
    event::{CapabilityCheck, Event, HookPoint, Screen},
    principal::{PrincipalId, PrincipalRef},
    role::RoleId,
};
use sitemgr_core::{
    traits::{PrincipalStore, SiteSettings},
    Dispatcher, Filters, ListFilter, RequestContext, TextFilter,
};

use crate::{
    bundle::BundleKind,
    config::{BundleFlags, SiteManagerConfig},
    resolve::role_of,
};

/// Granted for the duration of a privacy-policy page edit check.
pub const PRIVACY_POLICY_GRANTS: [&str; 2] = ["edit_others_pages", "manage_options"];

pub struct ActionGuard {
    restricted: RoleId,
    admin: RoleId,
    bundles: BundleFlags,
    blocked_screens: Vec<String>,
    error_title: String,
    error_message: String,
    filters: Arc<Filters>,
    principals: Arc<dyn PrincipalStore>,
    settings: Arc<dyn SiteSettings>,
}

impl ActionGuard {
    pub fn new(
        config: &SiteManagerConfig,
        filters: Arc<Filters>,
        principals: Arc<dyn PrincipalStore>,
        settings: Arc<dyn SiteSettings>,
    ) -> Self {
        let restricted =
            RoleId::new(filters.apply_text(TextFilter::RoleName, config.role_name.as_str()));
        Self {
            restricted,
            admin: RoleId::administrator(),
            bundles: config.bundles,
            blocked_screens: config.blocked_screens.clone(),
            error_title: config.error_title.clone(),
            error_message: config.error_message.clone(),
            filters,
            principals,
            settings,
        }
    }

    pub fn restricted_role(&self) -> &RoleId {
        &self.restricted
    }

    /// Subscribe the interception points of every enabled bundle.
    pub fn register(self: Arc<Self>, dispatcher: &mut Dispatcher) {
        if self.bundles.is_enabled(BundleKind::Users) {
            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::RoleChanged, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                if let Event::RoleChanged { principal, new_role, old_roles } = &event {
                    guard.check_role_change(ctx, *principal, new_role, old_roles)?;
                }
                Ok(event)
            });

            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::ScreenRendered, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                if let Event::ScreenRendered { screen } = &event {
                    guard.check_user_screen(ctx, screen)?;
                }
                Ok(event)
            });

            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::PrincipalCreated, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                if let Event::PrincipalCreated { principal } = &event {
                    guard.correct_principal(ctx, *principal)?;
                }
                Ok(event)
            });

            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::PrincipalUpdated, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                if let Event::PrincipalUpdated { principal } = &event {
                    guard.correct_principal(ctx, *principal)?;
                }
                Ok(event)
            });

            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::PrincipalDeleted, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                if let Event::PrincipalDeleted { principal } = &event {
                    guard.check_delete(ctx, *principal)?;
                }
                Ok(event)
            });

            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::EditableRolesListed, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                match event {
                    Event::EditableRolesListed { roles } => Ok(Event::EditableRolesListed {
                        roles: guard.filter_editable_roles(ctx, roles),
                    }),
                    other => Ok(other),
                }
            });
        }

        if self.bundles.is_enabled(BundleKind::Theme) {
            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::ScreenRendered, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                if let Event::ScreenRendered { screen } = &event {
                    guard.check_theme_screen(ctx, screen)?;
                }
                Ok(event)
            });
        }

        if self.bundles.is_enabled(BundleKind::PrivacyPolicy) {
            let guard = Arc::clone(&self);
            dispatcher.on(HookPoint::CapabilityEvaluated, move |ctx: &RequestContext, event: Event| -> SiteResult<Event> {
                match event {
                    Event::CapabilityEvaluated { check } => Ok(Event::CapabilityEvaluated {
                        check: guard.filter_capability_check(ctx, check),
                    }),
                    other => Ok(other),
                }
            });
        }
    }

    // ── Predicates ───────────────────────────────────────────────────────────

    pub fn is_restricted(&self, ctx: &RequestContext, who: &PrincipalRef) -> bool {
        role_of(self.principals.as_ref(), ctx, who).as_ref() == Some(&self.restricted)
    }

    pub fn is_administrator(&self, ctx: &RequestContext, who: &PrincipalRef) -> bool {
        role_of(self.principals.as_ref(), ctx, who).as_ref() == Some(&self.admin)
    }

    // ── Interception points ──────────────────────────────────────────────────

    /// Remove the administrator entry from the roles a restricted principal
    /// may assign.
    pub fn filter_editable_roles(
        &self,
        ctx: &RequestContext,
        mut roles: BTreeMap<RoleId, String>,
    ) -> BTreeMap<RoleId, String> {
        if self.is_restricted(ctx, &PrincipalRef::Current) {
            roles.remove(&self.admin);
        }
        roles
    }

    /// Undo a role change that moves a principal off administrator, or onto
    /// it, when the actor is not allowed to, then deny.
    ///
    /// Any actor other than an administrator may not change an
    /// administrator's role. A restricted actor may not grant the
    /// administrator role to anyone, itself included.
    pub fn check_role_change(
        &self,
        ctx: &RequestContext,
        principal: PrincipalId,
        new_role: &RoleId,
        old_roles: &[RoleId],
    ) -> SiteResult<()> {
        if self.is_administrator(ctx, &PrincipalRef::Current) {
            return Ok(());
        }

        let old_role = old_roles.first();
        if old_role == Some(&self.admin) {
            self.revert_role(ctx, principal, Some(&self.admin));
            return Err(self.deny(ctx, "role change on administrator"));
        }

        if *new_role == self.admin && self.is_restricted(ctx, &PrincipalRef::Current) {
            self.revert_role(ctx, principal, old_role);
            return Err(self.deny(ctx, "grant administrator role"));
        }

        Ok(())
    }

    /// Put `principal` back on `role`. With no previous role the
    /// administrator role is taken away instead.
    fn revert_role(&self, ctx: &RequestContext, principal: PrincipalId, role: Option<&RoleId>) {
        let result = match role {
            Some(role) => self.principals.set_principal_role(principal, role),
            None => self.principals.remove_principal_role(principal, &self.admin),
        };
        match result {
            Ok(()) => info!(
                request_id = %ctx.request_id,
                principal = %principal,
                role = ?role,
                "reverted role change"
            ),
            Err(err) => warn!(
                request_id = %ctx.request_id,
                principal = %principal,
                error = %err,
                "could not revert role change"
            ),
        }
    }

    /// Deny opening the edit or list screen of an administrator.
    pub fn check_user_screen(&self, ctx: &RequestContext, screen: &Screen) -> SiteResult<()> {
        let Some(target) = screen_target(ctx, screen) else {
            return Ok(());
        };
        if !self.is_restricted(ctx, &PrincipalRef::Current)
            || !self.is_administrator(ctx, &PrincipalRef::ById(target))
        {
            return Ok(());
        }
        Err(self.deny(ctx, "administrator user screen"))
    }

    /// Deny opening any screen in the blocked appearance family.
    pub fn check_theme_screen(&self, ctx: &RequestContext, screen: &Screen) -> SiteResult<()> {
        if !self.is_restricted(ctx, &PrincipalRef::Current) {
            return Ok(());
        }
        let blocked = self
            .filters
            .apply_list(ListFilter::BlockedScreens, self.blocked_screens.clone());
        if !blocked.iter().any(|b| *b == screen.base) {
            return Ok(());
        }
        Err(self.deny(ctx, "blocked screen"))
    }

    /// Demote a principal a restricted actor turned into an administrator.
    ///
    /// Returns `true` if a correction was made. Never denies.
    pub fn correct_principal(&self, ctx: &RequestContext, principal: PrincipalId) -> SiteResult<bool> {
        if !self.is_restricted(ctx, &PrincipalRef::Current)
            || !self.is_administrator(ctx, &PrincipalRef::ById(principal))
        {
            return Ok(false);
        }

        self.principals.remove_principal_role(principal, &self.admin)?;
        self.principals.add_principal_role(principal, &self.restricted)?;

        info!(
            request_id = %ctx.request_id,
            principal = %principal,
            role = %self.restricted,
            "demoted administrator created by restricted principal"
        );
        Ok(true)
    }

    /// Deny deleting an administrator.
    pub fn check_delete(&self, ctx: &RequestContext, principal: PrincipalId) -> SiteResult<()> {
        if !self.is_restricted(ctx, &PrincipalRef::Current)
            || !self.is_administrator(ctx, &PrincipalRef::ById(principal))
        {
            return Ok(());
        }
        Err(self.deny(ctx, "delete administrator"))
    }

    /// Grant the privacy-policy page edit capabilities for this check only.
    pub fn filter_capability_check(&self, ctx: &RequestContext, mut check: CapabilityCheck) -> CapabilityCheck {
        if !check.principal.holds(&self.restricted) {
            return check;
        }

        let object = check.object_id.unwrap_or(0);
        let privacy_page = self.settings.privacy_policy_page(ctx.tenant).unwrap_or(0);
        if object == 0 || privacy_page == 0 || object != privacy_page {
            return check;
        }

        for name in PRIVACY_POLICY_GRANTS {
            check.granted.grant(name);
        }
        debug!(
            request_id = %ctx.request_id,
            principal = %check.principal.id,
            page = object,
            "granted privacy policy page capabilities"
        );
        check
    }

    // ── Denial ───────────────────────────────────────────────────────────────

    /// Build the terminal 403 response. Title and message pass through the
    /// `ErrorTitle` and `ErrorMessage` filters.
    pub fn deny(&self, ctx: &RequestContext, action: &str) -> SiteManagerError {
        let title = self.filters.apply_text(TextFilter::ErrorTitle, self.error_title.as_str());
        let message = self
            .filters
            .apply_text(TextFilter::ErrorMessage, self.error_message.as_str());

        warn!(
            request_id = %ctx.request_id,
            tenant = %ctx.tenant,
            actor = ?ctx.current_principal().map(|p| p.id),
            action,
            "access denied"
        );

        SiteManagerError::access_denied(title, message)
    }
}

/// The user a user-edit or user-list screen targets, from its request
/// parameter. Unparseable, zero or negative values mean "no target".
pub fn screen_target(ctx: &RequestContext, screen: &Screen) -> Option<PrincipalId> {
    let param = match screen.base.as_str() {
        Screen::USER_EDIT => "user_id",
        Screen::USERS => "user",
        _ => return None,
    };
    let value = coerce_int(ctx.param(param)?);
    (value > 0).then(|| PrincipalId(value as u64))
}

/// Integer cast semantics: leading whitespace, an optional sign, then the
/// leading run of digits. Anything unparseable is 0.
fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}
