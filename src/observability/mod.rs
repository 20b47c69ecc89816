//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and passes produce:
//!     → logging.rs (structured log events, one span per pass)
//!     → metrics.rs (pass, action and handler error counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
