//! Annotation store with change tracking.
//!
//! # Responsibilities
//! - Hold default annotation values
//! - Hold the latest source data
//! - Compute the status of each annotation against the last applied values
//!
//! # Design Decisions
//! - Effective value = source value, else default
//! - `commit()` is called by the caller once a pass has been applied
//! - Rejected values are never recorded as applied, so they resolve again next pass

use std::collections::HashMap;

use crate::annotations::value::{AnnotationResolver, AnnotationStatus, AnnotationValue};

/// Built-in default annotations.
pub fn builtin_defaults() -> HashMap<String, String> {
    [
        ("syslog-server", "address:127.0.0.1, facility: local0, level: notice"),
        ("timeout-http-request", "5s"),
        ("timeout-connect", "5s"),
        ("timeout-client", "50s"),
        ("timeout-queue", "5s"),
        ("timeout-server", "50s"),
        ("timeout-tunnel", "1h"),
        ("timeout-http-keep-alive", "1m"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Tracks source annotations and what has already been applied.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    defaults: HashMap<String, String>,
    applied: HashMap<String, String>,
    current: HashMap<String, String>,
}

impl AnnotationStore {
    /// Create an empty store without defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with default values.
    pub fn with_defaults(defaults: HashMap<String, String>) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Replace the source data.
    pub fn update(&mut self, data: HashMap<String, String>) {
        self.current = data;
    }

    fn effective(&self, name: &str) -> Option<&String> {
        self.current.get(name).or_else(|| self.defaults.get(name))
    }

    /// Returns true if any annotation would resolve to a non-empty status.
    pub fn has_pending(&self) -> bool {
        let mut names = self.applied.keys().chain(self.current.keys()).chain(self.defaults.keys());
        names.any(|name| {
            self.resolve(name)
                .map(|v| v.status != AnnotationStatus::Empty)
                .unwrap_or(false)
        })
    }

    /// Promote the effective values to the applied snapshot.
    pub fn commit(&mut self) {
        self.commit_except(&[]);
    }

    /// Like `commit`, but `rejected` annotations keep their previously applied value.
    pub fn commit_except(&mut self, rejected: &[&str]) {
        let mut applied = self.defaults.clone();
        for (k, v) in &self.current {
            applied.insert(k.clone(), v.clone());
        }
        for name in rejected {
            match self.applied.get(*name) {
                Some(previous) => {
                    applied.insert(name.to_string(), previous.clone());
                }
                None => {
                    applied.remove(*name);
                }
            }
        }
        self.applied = applied;
    }
}

impl AnnotationResolver for AnnotationStore {
    fn resolve(&self, name: &str) -> Option<AnnotationValue> {
        match (self.applied.get(name), self.effective(name)) {
            (None, None) => None,
            (None, Some(new)) => Some(AnnotationValue::new(new.clone(), AnnotationStatus::Added)),
            (Some(old), None) => Some(AnnotationValue::new(old.clone(), AnnotationStatus::Deleted)),
            (Some(old), Some(new)) if old == new => {
                Some(AnnotationValue::new(new.clone(), AnnotationStatus::Empty))
            }
            (Some(_), Some(new)) => {
                Some(AnnotationValue::new(new.clone(), AnnotationStatus::Modified))
            }
        }
    }
}
