//! # sitemgr-contracts
//!
//! Shared types and error contracts for the Site Manager role gate.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod capability;
pub mod error;
pub mod event;
pub mod principal;
pub mod role;
