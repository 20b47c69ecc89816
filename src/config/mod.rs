//! Controller settings and annotation sources.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ControllerConfig (validated, immutable)
//!
//! annotation source file (TOML [data] table):
//!     watcher.rs detects change
//!     → loader.rs loads the new data
//!     → sent to the reconcile loop over a channel
//!     → AnnotationStore::update()
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks
//! - A source file that fails to parse keeps the previous annotations

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_annotations, load_config, ConfigError};
pub use schema::{ControllerConfig, LogFormat, ObservabilityConfig, ReconcileConfig};
pub use watcher::AnnotationWatcher;
