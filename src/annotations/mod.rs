//! Annotation subsystem.
//!
//! # Data Flow
//! ```text
//! Source data (ConfigMap-shaped key/value map)
//!     → store.rs (merge with defaults, diff against last applied values)
//!     → value.rs (AnnotationValue tagged with AnnotationStatus)
//!     → handlers consume exactly one value per directive per pass
//! ```
//!
//! # Design Decisions
//! - Change detection happens once, in the store; handlers never re-diff strings
//! - `Empty` always means "nothing to do for this directive this pass"
//! - `Deleted` carries the previously applied value

pub mod store;
pub mod value;

pub use store::{builtin_defaults, AnnotationStore};
pub use value::{AnnotationResolver, AnnotationStatus, AnnotationValue};

/// Annotation names recognised by the reconciliation core.
pub const KNOWN_ANNOTATIONS: &[&str] = &[
    "nbthread",
    "syslog-server",
    "timeout-http-request",
    "timeout-connect",
    "timeout-client",
    "timeout-queue",
    "timeout-server",
    "timeout-tunnel",
    "timeout-http-keep-alive",
    "maxconn",
    "log-format",
    "proxy-protocol",
];

/// Returns true if `name` belongs to the recognised vocabulary.
pub fn is_known(name: &str) -> bool {
    KNOWN_ANNOTATIONS.contains(&name)
}
