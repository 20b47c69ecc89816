//! HAProxy ingress reconciliation core.
//!
//! Translates status-tagged annotations into mutations of an in-memory
//! proxy configuration and classifies the result as no-op, hot reload or
//! full restart.

pub mod annotations;
pub mod config;
pub mod error;
pub mod handlers;
pub mod haproxy;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod rules;

pub use annotations::{AnnotationResolver, AnnotationStatus, AnnotationStore, AnnotationValue};
pub use config::ControllerConfig;
pub use error::ReconcileError;
pub use haproxy::{Configuration, Transaction};
pub use lifecycle::Shutdown;
pub use reconcile::{Action, PassReport, Reconciler, RestartDecision, SyncPass};
