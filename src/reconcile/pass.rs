//! One synchronization pass.
//!
//! # Responsibilities
//! - Run every handler once, in fixed order
//! - OR their decisions together
//! - Collect handler errors without aborting the pass

use serde::Serialize;
use uuid::Uuid;

use crate::annotations::AnnotationResolver;
use crate::error::ReconcileError;
use crate::handlers::{default_handlers, AnnotationHandler, PassContext};
use crate::haproxy::Transaction;
use crate::observability::metrics;
use crate::reconcile::decision::{Action, RestartDecision};
use crate::rules::{FrontendRules, TcpRuleType};

/// A handler error tagged with the annotation it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerError {
    pub annotation: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: ReconcileError,
}

fn serialize_display<S: serde::Serializer>(
    error: &ReconcileError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub pass_id: Uuid,
    pub decision: RestartDecision,
    pub frontend_rules_modified: bool,
    pub errors: Vec<HandlerError>,
}

impl PassReport {
    pub fn action(&self) -> Action {
        Action::classify(self.decision, self.frontend_rules_modified)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Annotations whose handler failed during the pass.
    pub fn failed_annotations(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.annotation.as_str()).collect()
    }
}

/// Ordered set of handlers run against one transaction.
#[derive(Debug)]
pub struct SyncPass {
    handlers: Vec<Box<dyn AnnotationHandler>>,
}

impl SyncPass {
    pub fn new() -> Self {
        Self::with_handlers(default_handlers())
    }

    pub fn with_handlers(handlers: Vec<Box<dyn AnnotationHandler>>) -> Self {
        Self { handlers }
    }

    /// Run all handlers. Always returns a report, possibly with errors.
    pub fn run(
        &self,
        annotations: &dyn AnnotationResolver,
        transaction: &mut Transaction,
        frontend_rules: &mut FrontendRules,
    ) -> PassReport {
        let pass_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_pass", %pass_id);
        let _guard = span.enter();

        let mut decision = RestartDecision::NONE;
        let mut errors = Vec::new();
        let mut ctx = PassContext::new(annotations, transaction, frontend_rules);

        for handler in &self.handlers {
            match handler.update(&mut ctx) {
                Ok(contribution) => decision |= contribution,
                Err(error) => {
                    tracing::error!(annotation = handler.annotation(), %error, "Handler failed");
                    metrics::record_handler_error(handler.annotation());
                    errors.push(HandlerError {
                        annotation: handler.annotation().to_string(),
                        error,
                    });
                }
            }
        }

        let report = PassReport {
            pass_id,
            decision,
            frontend_rules_modified: ctx.frontend_rules.any_modified(),
            errors,
        };
        metrics::record_pass(report.action().as_str());
        tracing::debug!(
            restart = decision.restart_requested,
            reload = decision.reload_requested,
            frontend_rules_modified = report.frontend_rules_modified,
            errors = report.errors.len(),
            "Pass complete"
        );
        report
    }

    /// TCP rule slots owned by handlers that failed in `report`.
    pub fn failed_tcp_slots(&self, report: &PassReport) -> Vec<TcpRuleType> {
        let failed = report.failed_annotations();
        self.handlers
            .iter()
            .filter(|h| failed.contains(&h.annotation()))
            .flat_map(|h| h.tcp_slots().iter().copied())
            .collect()
    }
}

impl Default for SyncPass {
    fn default() -> Self {
        Self::new()
    }
}
