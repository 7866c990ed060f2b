//! Per-request context.
//!
//! The acting principal and the current tenant are request-scoped values
//! supplied by the host. They are threaded explicitly into every guard call
//! and never cached across requests.

use std::collections::HashMap;

use sitemgr_contracts::{
    event::{RequestId, TenantId},
    principal::Principal,
};

/// Everything a guard may know about the request it runs in.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub tenant: TenantId,
    /// The acting principal, or `None` for an anonymous request.
    pub current: Option<Principal>,
    params: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(tenant: TenantId, current: Option<Principal>) -> Self {
        Self {
            request_id: RequestId::new(),
            tenant,
            current,
            params: HashMap::new(),
        }
    }

    /// Attach a request parameter (query-string value).
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn current_principal(&self) -> Option<&Principal> {
        self.current.as_ref()
    }
}
