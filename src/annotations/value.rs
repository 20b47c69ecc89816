//! Status-tagged annotation values.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Change status of an annotation since the last applied pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStatus {
    /// Unchanged, nothing to do.
    Empty,
    /// Newly present.
    Added,
    /// Present with a different value.
    Modified,
    /// Was present, now removed.
    Deleted,
}

impl AnnotationStatus {
    /// True for `Added` and `Modified`.
    pub fn is_present(self) -> bool {
        matches!(self, AnnotationStatus::Added | AnnotationStatus::Modified)
    }
}

impl fmt::Display for AnnotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnnotationStatus::Empty => "empty",
            AnnotationStatus::Added => "added",
            AnnotationStatus::Modified => "modified",
            AnnotationStatus::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// An annotation value together with its change status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationValue {
    pub value: String,
    pub status: AnnotationStatus,
}

impl AnnotationValue {
    pub fn new(value: impl Into<String>, status: AnnotationStatus) -> Self {
        Self {
            value: value.into(),
            status,
        }
    }
}

/// Source of status-tagged annotation values for one pass.
pub trait AnnotationResolver {
    /// Resolve an annotation by name. `None` means the annotation is unknown.
    fn resolve(&self, name: &str) -> Option<AnnotationValue>;
}

impl AnnotationResolver for HashMap<String, AnnotationValue> {
    fn resolve(&self, name: &str) -> Option<AnnotationValue> {
        self.get(name).cloned()
    }
}
