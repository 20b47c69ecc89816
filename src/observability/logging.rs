//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Map controller log levels onto tracing filters
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::LogFormat;

/// Log levels accepted in settings and on the command line.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warning", "error"];

/// Translate a controller log level into a tracing filter directive.
pub fn filter_directive(level: &str) -> String {
    let level = match level {
        "warning" => "warn",
        other => other,
    };
    format!("ingress_reconciler={}", level)
}

/// Install the global subscriber.
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}
