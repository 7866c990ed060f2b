//! Error types for the Site Manager role gate.
//!
//! All fallible operations return `SiteResult<T>`. Lookup misses (unknown
//! principal, missing base role) are not errors: they surface as `None` or a
//! skipped outcome and never reach this type.

use thiserror::Error;

/// The unified error type for the role gate.
#[derive(Debug, Error)]
pub enum SiteManagerError {
    /// A guard vetoed the action. Terminal: the host must stop processing
    /// the request and render this response.
    #[error("{title} ({status}): {message}")]
    AccessDenied {
        title: String,
        message: String,
        status: u16,
    },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The tenant context could not be switched during a multi-site rebuild.
    #[error("cannot switch to tenant {tenant}: {reason}")]
    TenantSwitch { tenant: u64, reason: String },

    /// A host store rejected a write.
    #[error("host error: {reason}")]
    HostError { reason: String },
}

impl SiteManagerError {
    /// HTTP-equivalent status carried by every access denial.
    pub const FORBIDDEN: u16 = 403;

    pub fn access_denied(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AccessDenied {
            title: title.into(),
            message: message.into(),
            status: Self::FORBIDDEN,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

/// Convenience alias used throughout the Site Manager crates.
pub type SiteResult<T> = Result<T, SiteManagerError>;
