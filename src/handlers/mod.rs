//! Directive handlers.
//!
//! # Data Flow
//! ```text
//! For each handler, in fixed order:
//!     → resolve its annotation (AnnotationResolver)
//!     → mutate the shared Transaction / FrontendRules
//!     → return its RestartDecision contribution or an error
//! ```
//!
//! # Design Decisions
//! - One handler per annotation; handlers never see each other's state
//! - The transaction is borrowed for the pass, never global
//! - Log targets and daemon mode form one two-stage handler

pub mod daemon;
pub mod proxy_protocol;
pub mod scalar;
pub mod syslog;

use crate::annotations::AnnotationResolver;
use crate::error::Result;
use crate::haproxy::Transaction;
use crate::reconcile::RestartDecision;
use crate::rules::{FrontendRules, TcpRuleType};

pub use proxy_protocol::ProxyProtocol;
pub use scalar::ScalarDirective;
pub use syslog::SyslogServer;

/// State shared by all handlers during one pass.
pub struct PassContext<'a> {
    pub annotations: &'a dyn AnnotationResolver,
    pub transaction: &'a mut Transaction,
    pub frontend_rules: &'a mut FrontendRules,
}

impl<'a> PassContext<'a> {
    pub fn new(
        annotations: &'a dyn AnnotationResolver,
        transaction: &'a mut Transaction,
        frontend_rules: &'a mut FrontendRules,
    ) -> Self {
        Self {
            annotations,
            transaction,
            frontend_rules,
        }
    }
}

/// Applies one annotation to the pass state.
pub trait AnnotationHandler: Send + Sync + std::fmt::Debug {
    /// Annotation this handler consumes.
    fn annotation(&self) -> &str;

    fn update(&self, ctx: &mut PassContext<'_>) -> Result<RestartDecision>;

    /// TCP rule slots this handler writes. Kept from the previous pass when it fails.
    fn tcp_slots(&self) -> &[TcpRuleType] {
        &[]
    }
}

/// Handlers in execution order.
pub fn default_handlers() -> Vec<Box<dyn AnnotationHandler>> {
    let mut handlers: Vec<Box<dyn AnnotationHandler>> = Vec::new();
    handlers.push(Box::new(ScalarDirective::nbthread()));
    handlers.push(Box::new(SyslogServer));
    for timeout in scalar::DEFAULT_TIMEOUTS {
        handlers.push(Box::new(ScalarDirective::timeout(timeout)));
    }
    handlers.push(Box::new(ScalarDirective::maxconn()));
    handlers.push(Box::new(ScalarDirective::log_format()));
    handlers.push(Box::new(ProxyProtocol));
    handlers
}
