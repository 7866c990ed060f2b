//! Capability mapping types.
//!
//! A role's capabilities are a mapping from capability name to a boolean
//! grant. A `false` entry is an explicit revocation and is distinct from an
//! absent entry only for display purposes: `has()` treats both as "not held".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An opaque capability name.
///
/// Names follow the host platform's convention: lowercase, underscore
/// separated, e.g. "edit_posts", "promote_users", "manage_options".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(pub String);

impl Capability {
    /// Construct a capability from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Capability {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The full capability mapping of a role, or the result of a single
/// capability evaluation.
///
/// Ordered by name so that two sets built from the same inputs compare and
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    inner: BTreeMap<Capability, bool>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a capability (sets it to `true`).
    pub fn grant(&mut self, capability: impl Into<Capability>) {
        self.inner.insert(capability.into(), true);
    }

    /// Set a capability to an explicit value, overwriting any existing entry.
    pub fn set(&mut self, capability: impl Into<Capability>, value: bool) {
        self.inner.insert(capability.into(), value);
    }

    /// Remove an entry entirely.
    pub fn remove(&mut self, capability: &Capability) -> Option<bool> {
        self.inner.remove(capability)
    }

    /// Return true if the set holds the capability with a `true` value.
    pub fn has(&self, capability: &Capability) -> bool {
        self.inner.get(capability).copied().unwrap_or(false)
    }

    /// Return the raw entry, distinguishing "absent" from "explicitly false".
    pub fn get(&self, capability: &Capability) -> Option<bool> {
        self.inner.get(capability).copied()
    }

    /// Merge `other` on top of this set. Entries in `other` win on collision.
    pub fn merge(&mut self, other: &CapabilitySet) {
        for (cap, value) in &other.inner {
            self.inner.insert(cap.clone(), *value);
        }
    }

    /// Return true if every entry of `other` is present here with the same value.
    pub fn contains_all(&self, other: &CapabilitySet) -> bool {
        other
            .inner
            .iter()
            .all(|(cap, value)| self.inner.get(cap) == Some(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Capability, bool)> {
        self.inner.iter().map(|(cap, value)| (cap, *value))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<C: Into<Capability>> FromIterator<(C, bool)> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = (C, bool)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(cap, value)| (cap.into(), value)).collect(),
        }
    }
}
