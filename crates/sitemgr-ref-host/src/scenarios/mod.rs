//! Reference scenarios.
//!
//! Each scenario seeds a fresh reference host, provisions the Site Manager
//! role and drives one family of host events through the guard.

pub mod privacy_policy;
pub mod provisioning;
pub mod registration;
pub mod role_change;
pub mod screens;
pub mod user_delete;

use sitemgr_contracts::error::{SiteManagerError, SiteResult};

/// One-line rendering of an event outcome for scenario output.
pub(crate) fn outcome<T>(result: &SiteResult<T>) -> String {
    match result {
        Ok(_) => "allowed".to_string(),
        Err(SiteManagerError::AccessDenied { status, title, .. }) => {
            format!("DENIED {} ({})", status, title)
        }
        Err(e) => format!("error: {}", e),
    }
}
