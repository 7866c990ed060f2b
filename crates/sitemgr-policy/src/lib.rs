//! # sitemgr-policy
//!
//! The Site Manager role: a restricted role with most administrator
//! capabilities that can never act on administrators.
//!
//! ## Overview
//!
//! - [`RoleBuilder`] computes the restricted role from a base role plus the
//!   enabled capability bundles and (re)registers it on every tenant.
//! - [`ActionGuard`] subscribes to host events and vetoes or corrects the
//!   actions the capability model alone would allow.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sitemgr_policy::{ActionGuard, RoleBuilder, SiteManagerConfig};
//!
//! let config = SiteManagerConfig::from_file(Path::new("sitemgr.toml"))?;
//! let filters = Arc::new(Filters::new());
//!
//! RoleBuilder::new(&config, filters.clone()).provision(&*registry, &*tenants)?;
//! Arc::new(ActionGuard::new(&config, filters, principals, settings)).register(&mut dispatcher);
//! ```

pub mod builder;
pub mod bundle;
pub mod config;
pub mod guard;
pub mod resolve;

#[cfg(test)]
mod testing;

pub use builder::{ProvisionOutcome, ProvisionReport, RoleBuilder};
pub use bundle::BundleKind;
pub use config::{BundleFlags, SiteManagerConfig};
pub use guard::ActionGuard;
