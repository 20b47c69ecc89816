//! HAProxy Ingress Reconciler
//!
//! Keeps the proxy configuration in sync with ConfigMap-style annotations.
//!
//! # Architecture Overview
//!
//! ```text
//!   annotations.toml ──▶ watcher ──▶ AnnotationStore (status per annotation)
//!                                          │
//!                                          ▼
//!        ┌──────────────────────── SyncPass ─────────────────────────┐
//!        │ nbthread → syslog-server (+daemon) → timeouts → maxconn   │
//!        │ → log-format → proxy-protocol                             │
//!        └───────────────┬──────────────────────────────┬────────────┘
//!                        ▼                              ▼
//!                  Transaction                    FrontendRules
//!                        │                              │
//!                        └──────────▶ PassReport ◀──────┘
//!                                         │
//!                                         ▼
//!                           noop / reload / restart
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use ingress_reconciler::annotations::{builtin_defaults, AnnotationStore};
use ingress_reconciler::config::{
    load_annotations, load_config, AnnotationWatcher, ControllerConfig, ReconcileConfig,
};
use ingress_reconciler::haproxy::Configuration;
use ingress_reconciler::lifecycle::{signals, Shutdown};
use ingress_reconciler::observability::{logging, metrics};
use ingress_reconciler::reconcile::{Action, Reconciler};

#[derive(Parser)]
#[command(name = "ingress-reconciler")]
#[command(about = "Reconciles HAProxy configuration with ingress annotations", long_about = None)]
struct Args {
    /// Controller settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Annotation source file, overrides the settings file.
    #[arg(short, long)]
    annotations: Option<PathBuf>,

    /// Level of log messages.
    #[arg(long = "log", value_parser = clap::builder::PossibleValuesParser::new(logging::LOG_LEVELS))]
    log_level: Option<String>,

    /// Run a single pass and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ControllerConfig::default(),
    };
    if let Some(path) = args.annotations {
        config.controller.annotations_path = path;
    }
    if let Some(level) = args.log_level {
        config.observability.log_level = level;
    }

    logging::init_logging(&config.observability.log_level, config.observability.log_format);

    tracing::info!("ingress-reconciler v0.1.0 starting");
    tracing::info!(
        annotations = %config.controller.annotations_path.display(),
        config_dir = %config.controller.config_dir.display(),
        sync_period_secs = config.controller.sync_period_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!("Failed to start metrics endpoint: {}", e);
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut defaults = builtin_defaults();
    defaults.extend(config.defaults.clone());
    let mut store = AnnotationStore::with_defaults(defaults);
    match load_annotations(&config.controller.annotations_path) {
        Ok(data) => store.update(data),
        Err(e) => tracing::warn!("Failed to load annotations: {}. Starting from defaults.", e),
    }

    let mut reconciler = Reconciler::new(Configuration::baseline(), store);

    if args.once {
        sync(&mut reconciler, &config.controller);
        return Ok(());
    }

    let (watcher, mut updates) = AnnotationWatcher::new(&config.controller.annotations_path);
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!("Annotation watcher unavailable: {}. Relying on periodic sync.", e);
            None
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);
    let mut shutdown_rx = shutdown.subscribe();

    let mut ticker = tokio::time::interval(Duration::from_secs(config.controller.sync_period_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if reconciler.store().has_pending() {
                    sync(&mut reconciler, &config.controller);
                }
            }
            Some(data) = updates.recv() => {
                reconciler.store_mut().update(data);
                sync(&mut reconciler, &config.controller);
            }
            _ = shutdown_rx.recv() => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn sync(reconciler: &mut Reconciler, settings: &ReconcileConfig) {
    let outcome = reconciler.sync();

    if outcome.requires_write() && settings.write_config {
        let path = settings.config_file();
        if let Err(e) = reconciler.write_config(&path) {
            tracing::error!(path = %path.display(), "Failed to write configuration: {}", e);
        }
    }

    for rule in outcome.frontend_rules.tcp_rules() {
        tracing::debug!(rule = %rule, "Frontend TCP rule");
    }

    match outcome.action() {
        Action::Restart => tracing::warn!(pass_id = %outcome.report.pass_id, "HAProxy restart required"),
        Action::Reload => tracing::info!(pass_id = %outcome.report.pass_id, "HAProxy reload required"),
        Action::NoOp => tracing::debug!("No HAProxy changes"),
    }
}
