//! Named single-value extension points.
//!
//! External collaborators override configuration at the point of use by
//! registering transforms here. Transforms for one point run in
//! registration order, each receiving the previous output.

use std::collections::HashMap;

use sitemgr_contracts::capability::CapabilitySet;

/// Extension points carrying a single string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFilter {
    BaseRole,
    RoleName,
    RoleLabel,
    ErrorTitle,
    ErrorMessage,
}

/// Extension points carrying a list of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListFilter {
    BlockedScreens,
}

type TextFn = Box<dyn Fn(String) -> String + Send + Sync>;
type ListFn = Box<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;
type CapabilitiesFn = Box<dyn Fn(CapabilitySet) -> CapabilitySet + Send + Sync>;

#[derive(Default)]
pub struct Filters {
    text: HashMap<TextFilter, Vec<TextFn>>,
    lists: HashMap<ListFilter, Vec<ListFn>>,
    capabilities: Vec<CapabilitiesFn>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text<F>(&mut self, point: TextFilter, f: F)
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.text.entry(point).or_default().push(Box::new(f));
    }

    pub fn add_list<F>(&mut self, point: ListFilter, f: F)
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.lists.entry(point).or_default().push(Box::new(f));
    }

    /// Register a transform for the merged capability mapping of the
    /// restricted role. Runs on every role build.
    pub fn add_capabilities<F>(&mut self, f: F)
    where
        F: Fn(CapabilitySet) -> CapabilitySet + Send + Sync + 'static,
    {
        self.capabilities.push(Box::new(f));
    }

    pub fn apply_text(&self, point: TextFilter, value: impl Into<String>) -> String {
        let value = value.into();
        match self.text.get(&point) {
            Some(chain) => chain.iter().fold(value, |acc, f| f(acc)),
            None => value,
        }
    }

    pub fn apply_list(&self, point: ListFilter, value: Vec<String>) -> Vec<String> {
        match self.lists.get(&point) {
            Some(chain) => chain.iter().fold(value, |acc, f| f(acc)),
            None => value,
        }
    }

    pub fn apply_capabilities(&self, value: CapabilitySet) -> CapabilitySet {
        self.capabilities.iter().fold(value, |acc, f| f(acc))
    }
}

#[cfg(test)]
mod tests {
    use sitemgr_contracts::capability::{Capability, CapabilitySet};

    use super::{Filters, ListFilter, TextFilter};

    #[test]
    fn unfiltered_values_pass_through() {
        let filters = Filters::new();
        assert_eq!(filters.apply_text(TextFilter::BaseRole, "editor"), "editor");
        assert_eq!(
            filters.apply_list(ListFilter::BlockedScreens, vec!["themes".to_string()]),
            vec!["themes".to_string()]
        );
    }

    #[test]
    fn text_transforms_chain_in_order() {
        let mut filters = Filters::new();
        filters.add_text(TextFilter::ErrorTitle, |t| format!("{t}!"));
        filters.add_text(TextFilter::ErrorTitle, |t| t.to_uppercase());

        assert_eq!(filters.apply_text(TextFilter::ErrorTitle, "nope"), "NOPE!");
        // Other points are unaffected.
        assert_eq!(filters.apply_text(TextFilter::ErrorMessage, "nope"), "nope");
    }

    #[test]
    fn list_transform_can_extend_blocked_screens() {
        let mut filters = Filters::new();
        filters.add_list(ListFilter::BlockedScreens, |mut screens| {
            screens.push("plugins".to_string());
            screens
        });

        let screens = filters.apply_list(ListFilter::BlockedScreens, vec!["themes".to_string()]);
        assert_eq!(screens, vec!["themes".to_string(), "plugins".to_string()]);
    }

    #[test]
    fn capability_transform_can_add_and_remove() {
        let mut filters = Filters::new();
        filters.add_capabilities(|mut caps| {
            caps.remove(&Capability::new("delete_users"));
            caps.grant("export");
            caps
        });

        let caps: CapabilitySet =
            [("delete_users", true), ("edit_users", true)].into_iter().collect();
        let out = filters.apply_capabilities(caps);

        assert!(!out.has(&Capability::new("delete_users")));
        assert!(out.has(&Capability::new("edit_users")));
        assert!(out.has(&Capability::new("export")));
    }
}
