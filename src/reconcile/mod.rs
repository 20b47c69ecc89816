//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciler::sync()
//!     → Configuration::begin() (fresh transaction)
//!     → FrontendRules::new() (fresh rule slots)
//!     → SyncPass::run() (handlers in fixed order)
//!     → restore rule slots of failed handlers from the previous pass
//!     → commit transaction if it has changes, else discard
//!     → AnnotationStore::commit_except(failed annotations)
//!     → PassReport → Action (noop / reload / restart)
//! ```
//!
//! # Design Decisions
//! - The caller owns the transaction and decides commit/discard
//! - Passes are serialized by `&mut self`
//! - A rejected annotation leaves both its rules and its applied value as they were
//! - Acting on the decision (signalling the proxy) is left to the caller

pub mod decision;
pub mod pass;

use std::fs;
use std::path::Path;

use crate::annotations::AnnotationStore;
use crate::haproxy::Configuration;
use crate::rules::FrontendRules;

pub use decision::{Action, RestartDecision};
pub use pass::{HandlerError, PassReport, SyncPass};

/// Result of a `Reconciler::sync` call.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub report: PassReport,
    pub frontend_rules: FrontendRules,
    /// Whether the transaction had changes and was committed.
    pub committed: bool,
}

impl SyncOutcome {
    pub fn action(&self) -> Action {
        self.report.action()
    }

    /// Whether the rendered configuration changed and must be written out.
    pub fn requires_write(&self) -> bool {
        self.committed || self.report.frontend_rules_modified
    }
}

/// Owns the committed configuration and the annotation store across passes.
#[derive(Debug)]
pub struct Reconciler {
    configuration: Configuration,
    frontend_rules: FrontendRules,
    store: AnnotationStore,
    pass: SyncPass,
}

impl Reconciler {
    pub fn new(configuration: Configuration, store: AnnotationStore) -> Self {
        Self {
            configuration,
            frontend_rules: FrontendRules::new(),
            store,
            pass: SyncPass::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Frontend rules of the last pass.
    pub fn frontend_rules(&self) -> &FrontendRules {
        &self.frontend_rules
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    /// Run one pass and commit its result.
    pub fn sync(&mut self) -> SyncOutcome {
        let mut transaction = self.configuration.begin();
        let mut frontend_rules = FrontendRules::new();

        let report = self.pass.run(&self.store, &mut transaction, &mut frontend_rules);
        for rule_type in self.pass.failed_tcp_slots(&report) {
            frontend_rules.restore_tcp_slot(&self.frontend_rules, rule_type);
        }

        let committed = transaction.has_changes();
        if committed {
            self.configuration = transaction.commit();
        } else {
            transaction.discard();
        }
        self.store.commit_except(&report.failed_annotations());
        self.frontend_rules = frontend_rules.clone();

        let outcome = SyncOutcome {
            report,
            frontend_rules,
            committed,
        };
        tracing::info!(
            pass_id = %outcome.report.pass_id,
            action = %outcome.action(),
            committed,
            errors = outcome.report.errors.len(),
            "Synchronization pass finished"
        );
        outcome
    }

    /// Render the committed configuration followed by the frontend rules.
    pub fn render(&self) -> String {
        let mut out = self.configuration.render();
        out.push_str(&self.frontend_rules.render());
        out
    }

    /// Write the rendered configuration to `path`.
    pub fn write_config(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        tracing::debug!(path = %path.display(), "Configuration written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haproxy::{Directive, Section};
    use std::collections::HashMap;

    #[test]
    fn test_sync_commits_and_settles() {
        let mut store = AnnotationStore::new();
        store.update(HashMap::from([("maxconn".to_string(), "500".to_string())]));
        let mut reconciler = Reconciler::new(Configuration::baseline(), store);

        let first = reconciler.sync();
        assert!(first.committed);
        assert_eq!(first.action(), Action::Reload);
        assert_eq!(
            reconciler.configuration().get(Section::Defaults, "maxconn"),
            Some(&Directive::Int(500))
        );

        let second = reconciler.sync();
        assert!(!second.committed);
        assert_eq!(second.action(), Action::NoOp);
    }
}
