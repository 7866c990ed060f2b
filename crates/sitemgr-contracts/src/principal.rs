//! Principal (user account) types and the tagged lookup reference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::RoleId;

/// Numeric identifier of a principal in the host's principal store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub u64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated user account, owned by the host.
///
/// By convention the first entry of `roles` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub login: String,
    pub email: String,
    pub roles: Vec<RoleId>,
}

impl Principal {
    /// The authoritative role: the first assigned role, if any.
    pub fn primary_role(&self) -> Option<&RoleId> {
        self.roles.first()
    }

    /// True if the role appears anywhere in the assignment list.
    pub fn holds(&self, role: &RoleId) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// How a guard names the principal it wants to inspect.
///
/// Each variant maps to exactly one lookup path in the principal store;
/// `Current` refers to the acting principal of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalRef {
    Current,
    Resolved(Principal),
    ById(PrincipalId),
    ByEmail(String),
    ByLogin(String),
}

impl From<PrincipalId> for PrincipalRef {
    fn from(id: PrincipalId) -> Self {
        Self::ById(id)
    }
}

impl From<Principal> for PrincipalRef {
    fn from(principal: Principal) -> Self {
        Self::Resolved(principal)
    }
}
