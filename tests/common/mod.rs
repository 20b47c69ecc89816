//! Shared helpers for reconciliation integration tests.

use std::collections::HashMap;

use ingress_reconciler::annotations::{AnnotationStatus, AnnotationValue};
use ingress_reconciler::haproxy::{Configuration, Transaction};
use ingress_reconciler::reconcile::{PassReport, SyncPass};
use ingress_reconciler::rules::FrontendRules;

/// Build a resolver from `(name, value, status)` triples.
pub fn annotations(entries: &[(&str, &str, AnnotationStatus)]) -> HashMap<String, AnnotationValue> {
    entries
        .iter()
        .map(|(name, value, status)| (name.to_string(), AnnotationValue::new(*value, *status)))
        .collect()
}

/// Result of running one pass over a fresh transaction.
pub struct PassRun {
    pub report: PassReport,
    pub transaction: Transaction,
    pub rules: FrontendRules,
}

/// Run the default pass against `base`.
pub fn run_pass(base: &Configuration, anns: &HashMap<String, AnnotationValue>) -> PassRun {
    let mut transaction = base.begin();
    let mut rules = FrontendRules::new();
    let report = SyncPass::new().run(anns, &mut transaction, &mut rules);
    PassRun {
        report,
        transaction,
        rules,
    }
}
