use std::collections::BTreeSet;

/// Ordered list of service endpoints currently linked to the balancer
/// service. Order is kept only for stable log output; equality between two
/// generations is decided on membership.
///
/// The registry has a single owner (the reconcile loop) and is replaced
/// wholesale on each topology change, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedServiceRegistry {
    endpoints: Vec<String>,
}

impl LinkedServiceRegistry {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// True when any candidate identifier is a tracked endpoint.
    pub fn contains_any(&self, candidates: &[String]) -> bool {
        let tracked: BTreeSet<&str> = self.endpoints.iter().map(String::as_str).collect();
        candidates
            .iter()
            .any(|candidate| tracked.contains(candidate.as_str()))
    }

    /// Replaces the whole endpoint list.
    pub fn replace(&mut self, endpoints: Vec<String>) {
        self.endpoints = endpoints;
    }

    /// Membership difference between the current list and a proposed one.
    /// Added/removed identifiers come back sorted for stable log lines.
    pub fn diff(&self, proposed: &[String]) -> LinkDiff {
        let current: BTreeSet<&str> = self.endpoints.iter().map(String::as_str).collect();
        let next: BTreeSet<&str> = proposed.iter().map(String::as_str).collect();
        LinkDiff {
            added: next.difference(&current).map(|s| s.to_string()).collect(),
            removed: current.difference(&next).map(|s| s.to_string()).collect(),
        }
    }
}

/// Endpoints added to and removed from the linked set by one topology change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl LinkDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Human-readable summary, e.g. `linked added: web-1; linked removed: web-0`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.added.is_empty() {
            parts.push(format!("linked added: {}", self.added.join(", ")));
        }
        if !self.removed.is_empty() {
            parts.push(format!("linked removed: {}", self.removed.join(", ")));
        }
        parts.join("; ")
    }
}
