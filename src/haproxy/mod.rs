//! Proxy configuration model.
//!
//! # Data Flow
//! ```text
//! Configuration (committed)
//!     → begin() → Transaction (working copy)
//!     → handlers get/set/insert/delete directives
//!     → commit() → new Configuration
//!     → render() → haproxy.cfg text
//! ```

pub mod directive;
pub mod transaction;

pub use directive::{Directive, LogTarget, Section};
pub use transaction::{Configuration, Transaction};
