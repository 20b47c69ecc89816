use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use ingress_reconciler::annotations::{builtin_defaults, AnnotationStore};
use ingress_reconciler::config::load_annotations;
use ingress_reconciler::haproxy::Configuration;
use ingress_reconciler::reconcile::{Action, PassReport, Reconciler};

#[derive(Parser)]
#[command(name = "reconcile-cli")]
#[command(about = "Run one reconciliation pass between two annotation files", long_about = None)]
struct Cli {
    /// Annotations already applied (omit for a first pass).
    #[arg(short, long)]
    previous: Option<PathBuf>,

    /// Annotations to apply.
    current: PathBuf,

    /// Seed the store with the built-in default annotations.
    #[arg(long)]
    defaults: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    action: Action,
    report: &'a PassReport,
    tcp_rules: Vec<String>,
    configuration: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let store = if cli.defaults {
        AnnotationStore::with_defaults(builtin_defaults())
    } else {
        AnnotationStore::new()
    };
    let mut reconciler = Reconciler::new(Configuration::baseline(), store);

    // Replay the previous annotations first so the second pass sees real statuses.
    if let Some(previous) = &cli.previous {
        reconciler.store_mut().update(load_annotations(previous)?);
        reconciler.sync();
    }

    let current: HashMap<String, String> = load_annotations(&cli.current)?;
    reconciler.store_mut().update(current);
    let outcome = reconciler.sync();

    let output = Output {
        action: outcome.action(),
        report: &outcome.report,
        tcp_rules: outcome
            .frontend_rules
            .tcp_rules()
            .iter()
            .map(|r| r.to_string())
            .collect(),
        configuration: reconciler.render(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
