//! Site Manager configuration schema.
//!
//! A `SiteManagerConfig` is deserialized from TOML. Every field has a
//! default, so an empty document yields the stock Site Manager role: an
//! editor clone plus every capability bundle.
//!
//! Example:
//! ```toml
//! base_role = "editor"
//! blocked_screens = ["themes", "customize", "widgets"]
//!
//! [bundles]
//! edit_woocommerce = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use sitemgr_contracts::{
    error::{SiteManagerError, SiteResult},
    role::RoleId,
};

use crate::bundle::BundleKind;

/// Per-bundle switches. An absent flag is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleFlags {
    pub edit_users: bool,
    pub edit_theme: bool,
    pub edit_privacy_policy: bool,
    pub edit_gravity_forms: bool,
    pub edit_woocommerce: bool,
    pub edit_yoast: bool,
}

impl Default for BundleFlags {
    fn default() -> Self {
        Self {
            edit_users: true,
            edit_theme: true,
            edit_privacy_policy: true,
            edit_gravity_forms: true,
            edit_woocommerce: true,
            edit_yoast: true,
        }
    }
}

impl BundleFlags {
    pub fn is_enabled(&self, kind: BundleKind) -> bool {
        match kind {
            BundleKind::Users => self.edit_users,
            BundleKind::Theme => self.edit_theme,
            BundleKind::PrivacyPolicy => self.edit_privacy_policy,
            BundleKind::GravityForms => self.edit_gravity_forms,
            BundleKind::WooCommerce => self.edit_woocommerce,
            BundleKind::Yoast => self.edit_yoast,
        }
    }

    /// Enabled bundles in table order.
    pub fn enabled(&self) -> Vec<BundleKind> {
        BundleKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

/// The top-level structure deserialized from a TOML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteManagerConfig {
    /// Identifier of the restricted role.
    pub role_name: String,

    /// Display label of the restricted role.
    pub role_label: String,

    /// Role whose capabilities the restricted role starts from.
    pub base_role: String,

    /// The protected role. Must be "administrator".
    pub admin_role: String,

    /// Screen base names a Site Manager may never open.
    pub blocked_screens: Vec<String>,

    pub error_title: String,

    pub error_message: String,

    pub bundles: BundleFlags,
}

impl Default for SiteManagerConfig {
    fn default() -> Self {
        Self {
            role_name: RoleId::SITE_MANAGER.to_string(),
            role_label: "Site Manager".to_string(),
            base_role: "editor".to_string(),
            admin_role: RoleId::ADMINISTRATOR.to_string(),
            blocked_screens: vec![
                "themes".to_string(),
                "customize".to_string(),
                "widgets".to_string(),
            ],
            error_title: "Access denied".to_string(),
            error_message: "Access denied. You must be an administrator to view this page."
                .to_string(),
            bundles: BundleFlags::default(),
        }
    }
}

impl SiteManagerConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `SiteManagerError::ConfigError` if the TOML is malformed,
    /// carries unknown keys, or fails validation.
    pub fn from_toml_str(s: &str) -> SiteResult<Self> {
        let config: SiteManagerConfig =
            toml::from_str(s).map_err(|e| SiteManagerError::ConfigError {
                reason: format!("failed to parse site manager TOML: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> SiteResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| SiteManagerError::ConfigError {
                reason: format!("failed to read config file '{}': {}", path.display(), e),
            })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> SiteResult<()> {
        if self.admin_role != RoleId::ADMINISTRATOR {
            return Err(SiteManagerError::ConfigError {
                reason: format!(
                    "admin_role must be '{}', got '{}'",
                    RoleId::ADMINISTRATOR,
                    self.admin_role
                ),
            });
        }
        if self.role_name.trim().is_empty() {
            return Err(SiteManagerError::ConfigError {
                reason: "role_name must not be empty".to_string(),
            });
        }
        if self.role_name == self.admin_role {
            return Err(SiteManagerError::ConfigError {
                reason: "role_name must differ from the administrator role".to_string(),
            });
        }
        if self.base_role.trim().is_empty() {
            return Err(SiteManagerError::ConfigError {
                reason: "base_role must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
