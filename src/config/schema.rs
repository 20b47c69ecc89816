//! Controller settings schema.
//!
//! This module defines the settings file of the controller itself. All
//! types derive Serde traits for deserialization from TOML.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings for the controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    /// Reconciliation loop settings.
    pub controller: ReconcileConfig,

    /// Default annotation values, overriding the built-in defaults.
    pub defaults: HashMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Reconciliation loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Annotation source file (TOML with a `[data]` table).
    pub annotations_path: PathBuf,

    /// Directory the rendered haproxy.cfg is written to.
    pub config_dir: PathBuf,

    /// Interval between synchronization passes in seconds.
    pub sync_period_secs: u64,

    /// Write the rendered configuration after each committed pass.
    pub write_config: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            annotations_path: PathBuf::from("/etc/haproxy-ingress/annotations.toml"),
            config_dir: PathBuf::from("/etc/haproxy/"),
            sync_period_secs: 5,
            write_config: true,
        }
    }
}

impl ReconcileConfig {
    /// Path of the rendered configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("haproxy.cfg")
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warning, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Annotation source file: a ConfigMap-shaped `[data]` table.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AnnotationSource {
    pub data: HashMap<String, String>,
}
