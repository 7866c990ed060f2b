//! Host events the gate intercepts, and their payloads.
//!
//! Every event is delivered as an `Event` value. Handlers return the
//! (possibly transformed) event so that filter-style events such as
//! `EditableRolesListed` and `CapabilityEvaluated` can rewrite their payload
//! while action-style events simply pass it through.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    capability::{Capability, CapabilitySet},
    principal::{Principal, PrincipalId},
    role::RoleId,
};

/// Unique identifier for a single host request.
///
/// Appears in every log line emitted while handling that request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a site in a multi-site installation.
///
/// Single-site installations use `TenantId::PRIMARY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub u64);

impl TenantId {
    pub const PRIMARY: TenantId = TenantId(1);
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An admin screen about to be rendered, identified by its base name
/// (e.g. "user-edit", "users", "themes", "widgets").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub base: String,
}

impl Screen {
    pub const USER_EDIT: &'static str = "user-edit";
    pub const USERS: &'static str = "users";

    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

/// A single capability evaluation in flight.
///
/// `principal` is the account whose capabilities are being checked,
/// `granted` the capability result computed so far, `requested` the
/// capability names the caller asked for, and `object_id` the object the
/// check applies to (a page id for page edits), if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityCheck {
    pub principal: Principal,
    pub granted: CapabilitySet,
    pub requested: Vec<Capability>,
    pub object_id: Option<u64>,
}

/// The named interception points a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    ScreenRendered,
    RoleChanged,
    PrincipalCreated,
    PrincipalUpdated,
    PrincipalDeleted,
    CapabilityEvaluated,
    EditableRolesListed,
}

impl HookPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::ScreenRendered => "screen_rendered",
            HookPoint::RoleChanged => "role_changed",
            HookPoint::PrincipalCreated => "principal_created",
            HookPoint::PrincipalUpdated => "principal_updated",
            HookPoint::PrincipalDeleted => "principal_deleted",
            HookPoint::CapabilityEvaluated => "capability_evaluated",
            HookPoint::EditableRolesListed => "editable_roles_listed",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host event together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A screen is about to render.
    ScreenRendered { screen: Screen },

    /// A principal's role was replaced through the direct role-mutation path.
    /// `old_roles` is the assignment list before the change.
    RoleChanged {
        principal: PrincipalId,
        new_role: RoleId,
        old_roles: Vec<RoleId>,
    },

    /// A principal was registered. The write has already been committed.
    PrincipalCreated { principal: PrincipalId },

    /// A principal's profile was updated. The write has already been committed.
    PrincipalUpdated { principal: PrincipalId },

    /// A principal is about to be deleted.
    PrincipalDeleted { principal: PrincipalId },

    /// A capability check is being evaluated.
    CapabilityEvaluated { check: CapabilityCheck },

    /// The list of roles offered for assignment (role id to display label).
    EditableRolesListed { roles: BTreeMap<RoleId, String> },
}

impl Event {
    /// The interception point this event is dispatched to.
    pub fn point(&self) -> HookPoint {
        match self {
            Event::ScreenRendered { .. } => HookPoint::ScreenRendered,
            Event::RoleChanged { .. } => HookPoint::RoleChanged,
            Event::PrincipalCreated { .. } => HookPoint::PrincipalCreated,
            Event::PrincipalUpdated { .. } => HookPoint::PrincipalUpdated,
            Event::PrincipalDeleted { .. } => HookPoint::PrincipalDeleted,
            Event::CapabilityEvaluated { .. } => HookPoint::CapabilityEvaluated,
            Event::EditableRolesListed { .. } => HookPoint::EditableRolesListed,
        }
    }
}
