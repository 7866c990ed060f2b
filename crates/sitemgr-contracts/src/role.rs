//! Role identity and registration types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::CapabilitySet;

/// Stable identifier of a role in the host's role registry.
///
/// Example: RoleId("editor"), RoleId("cgit_site_manager")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl RoleId {
    /// The host platform's top-level privileged role. Never mutated here.
    pub const ADMINISTRATOR: &'static str = "administrator";

    /// Default identifier of the restricted Site Manager role.
    pub const SITE_MANAGER: &'static str = "cgit_site_manager";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn administrator() -> Self {
        Self::new(Self::ADMINISTRATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_administrator(&self) -> bool {
        self.0 == Self::ADMINISTRATOR
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A role as held by the host registry: identifier, display label and the
/// full capability mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub label: String,
    pub capabilities: CapabilitySet,
}
