//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     trigger → reconcile loop finishes its current pass → exit
//! ```
//!
//! # Design Decisions
//! - A pass is never interrupted; shutdown is observed between passes

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
