//! # sitemgr-core
//!
//! The seams between the Site Manager role gate and its host platform.
//!
//! This crate provides:
//! - The host traits (`RoleRegistry`, `PrincipalStore`, `SiteSettings`,
//!   `TenantDirectory`) the gate reads and corrects state through
//! - `RequestContext`, the per-request carrier of the acting principal,
//!   the current tenant and request parameters
//! - `Dispatcher`, the observer registry the host emits events into
//! - `Filters`, the named single-value extension points
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitemgr_core::{Dispatcher, RequestContext};
//!
//! let outcome = dispatcher.emit(&ctx, Event::PrincipalDeleted { principal })?;
//! ```

pub mod context;
pub mod dispatcher;
pub mod filters;
pub mod tenant;
pub mod traits;

pub use context::RequestContext;
pub use dispatcher::{Dispatcher, EventHandler};
pub use filters::{Filters, ListFilter, TextFilter};
pub use tenant::with_tenant;
