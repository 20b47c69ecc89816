//! Generic one-annotation-to-one-directive applier.
//!
//! # Responsibilities
//! - `Empty` → no change
//! - `Deleted` → remove the directive, reload
//! - `Added`/`Modified` → parse and set the directive, reload
//!
//! # Design Decisions
//! - No comparison with the current directive value: setting an equal value
//!   still asks for a reload
//! - A parse failure leaves the transaction untouched and is reported

use crate::annotations::AnnotationStatus;
use crate::error::{ReconcileError, Result};
use crate::handlers::{AnnotationHandler, PassContext};
use crate::haproxy::{Directive, Section};
use crate::reconcile::RestartDecision;

/// Timeout kinds configured in the defaults section.
pub const DEFAULT_TIMEOUTS: [&str; 7] = [
    "http-request",
    "connect",
    "client",
    "queue",
    "server",
    "tunnel",
    "http-keep-alive",
];

const TIMEOUT_UNITS: [&str; 6] = ["us", "ms", "s", "m", "h", "d"];

/// Converts an annotation value into a directive.
pub type ValueParser = fn(&str) -> std::result::Result<Directive, String>;

/// Maps one annotation onto one `(section, key)` directive.
#[derive(Debug, Clone)]
pub struct ScalarDirective {
    annotation: String,
    section: Section,
    key: String,
    parse: ValueParser,
}

impl ScalarDirective {
    pub fn new(
        annotation: impl Into<String>,
        section: Section,
        key: impl Into<String>,
        parse: ValueParser,
    ) -> Self {
        Self {
            annotation: annotation.into(),
            section,
            key: key.into(),
            parse,
        }
    }

    /// `nbthread` in the global section, capped at the available parallelism.
    pub fn nbthread() -> Self {
        Self::new("nbthread", Section::Global, "nbthread", parse_thread_count)
    }

    /// `timeout-<kind>` → `timeout <kind>` in the defaults section.
    pub fn timeout(kind: &str) -> Self {
        Self::new(
            format!("timeout-{}", kind),
            Section::Defaults,
            format!("timeout {}", kind),
            parse_timeout,
        )
    }

    pub fn maxconn() -> Self {
        Self::new("maxconn", Section::Defaults, "maxconn", parse_int)
    }

    pub fn log_format() -> Self {
        Self::new("log-format", Section::Defaults, "log-format", parse_log_format)
    }
}

impl AnnotationHandler for ScalarDirective {
    fn annotation(&self) -> &str {
        &self.annotation
    }

    fn update(&self, ctx: &mut PassContext<'_>) -> Result<RestartDecision> {
        let Some(ann) = ctx.annotations.resolve(&self.annotation) else {
            return Ok(RestartDecision::NONE);
        };

        match ann.status {
            AnnotationStatus::Empty => Ok(RestartDecision::NONE),
            AnnotationStatus::Deleted => {
                ctx.transaction.delete(self.section, &self.key);
                tracing::info!(
                    section = %self.section,
                    directive = %self.key,
                    "Removing directive"
                );
                Ok(RestartDecision::RELOAD)
            }
            AnnotationStatus::Added | AnnotationStatus::Modified => {
                let directive = (self.parse)(&ann.value).map_err(|reason| {
                    tracing::warn!(
                        annotation = %self.annotation,
                        value = %ann.value,
                        %reason,
                        "Ignoring invalid annotation value"
                    );
                    ReconcileError::InvalidValue {
                        annotation: self.annotation.clone(),
                        value: ann.value.clone(),
                        reason,
                    }
                })?;
                ctx.transaction.set(self.section, &self.key, Some(directive));
                tracing::info!(
                    section = %self.section,
                    directive = %self.key,
                    value = %ann.value,
                    "Setting directive"
                );
                Ok(RestartDecision::RELOAD)
            }
        }
    }
}

/// Number of parallel execution units on this host.
pub fn available_threads() -> i64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1)
}

fn parse_thread_count(value: &str) -> std::result::Result<Directive, String> {
    let requested: i64 = value.trim().parse().map_err(|e| format!("{}", e))?;
    if requested < 1 {
        return Err("thread count must be at least 1".to_string());
    }
    Ok(Directive::Int(requested.min(available_threads())))
}

fn parse_int(value: &str) -> std::result::Result<Directive, String> {
    value
        .trim()
        .parse::<i64>()
        .map(Directive::Int)
        .map_err(|e| format!("{}", e))
}

fn parse_timeout(value: &str) -> std::result::Result<Directive, String> {
    let value = value.trim();
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    if digits_end == 0 {
        return Err("timeout must start with a number".to_string());
    }
    let unit = &value[digits_end..];
    if !unit.is_empty() && !TIMEOUT_UNITS.contains(&unit) {
        return Err(format!("unknown time unit {:?}", unit));
    }
    Ok(Directive::Timeout(value.to_string()))
}

fn parse_log_format(value: &str) -> std::result::Result<Directive, String> {
    Ok(Directive::Text(format!("'{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationValue;
    use crate::haproxy::Configuration;
    use crate::rules::FrontendRules;
    use std::collections::HashMap;

    fn annotations(name: &str, value: &str, status: AnnotationStatus) -> HashMap<String, AnnotationValue> {
        let mut map = HashMap::new();
        map.insert(name.to_string(), AnnotationValue::new(value, status));
        map
    }

    fn run(
        handler: &ScalarDirective,
        annotations: &HashMap<String, AnnotationValue>,
        config: &Configuration,
    ) -> (Result<RestartDecision>, Configuration, bool) {
        let mut txn = config.begin();
        let mut rules = FrontendRules::new();
        let result = {
            let mut ctx = PassContext::new(annotations, &mut txn, &mut rules);
            handler.update(&mut ctx)
        };
        let dirty = txn.has_changes();
        (result, txn.commit(), dirty)
    }

    #[test]
    fn test_empty_is_noop() {
        let handler = ScalarDirective::maxconn();
        let anns = annotations("maxconn", "100", AnnotationStatus::Empty);
        let (result, config, dirty) = run(&handler, &anns, &Configuration::new());
        assert_eq!(result, Ok(RestartDecision::NONE));
        assert!(!dirty);
        assert!(config.get(Section::Defaults, "maxconn").is_none());
    }

    #[test]
    fn test_absent_is_noop() {
        let handler = ScalarDirective::maxconn();
        let (result, _, dirty) = run(&handler, &HashMap::new(), &Configuration::new());
        assert_eq!(result, Ok(RestartDecision::NONE));
        assert!(!dirty);
    }

    #[test]
    fn test_set_maxconn() {
        let handler = ScalarDirective::maxconn();
        let anns = annotations("maxconn", "2000", AnnotationStatus::Added);
        let (result, config, dirty) = run(&handler, &anns, &Configuration::new());
        assert_eq!(result, Ok(RestartDecision::RELOAD));
        assert!(dirty);
        assert_eq!(config.get(Section::Defaults, "maxconn"), Some(&Directive::Int(2000)));
    }

    #[test]
    fn test_deleted_is_idempotent_and_still_reloads() {
        let handler = ScalarDirective::timeout("connect");
        let mut txn = Configuration::new().begin();
        txn.set(Section::Defaults, "timeout connect", Some(Directive::Timeout("5s".into())));
        let config = txn.commit();

        let anns = annotations("timeout-connect", "5s", AnnotationStatus::Deleted);
        let (first, config, _) = run(&handler, &anns, &config);
        assert_eq!(first, Ok(RestartDecision::RELOAD));
        assert!(config.get(Section::Defaults, "timeout connect").is_none());

        let (second, again, dirty) = run(&handler, &anns, &config);
        assert_eq!(second, Ok(RestartDecision::RELOAD));
        assert!(dirty);
        assert_eq!(again, config);
    }

    #[test]
    fn test_invalid_value_leaves_transaction_untouched() {
        let handler = ScalarDirective::maxconn();
        let anns = annotations("maxconn", "lots", AnnotationStatus::Modified);
        let (result, config, dirty) = run(&handler, &anns, &Configuration::new());
        assert!(matches!(result, Err(ReconcileError::InvalidValue { .. })));
        assert!(!dirty);
        assert_eq!(config, Configuration::new());
    }

    #[test]
    fn test_nbthread_clamped() {
        let handler = ScalarDirective::nbthread();
        let anns = annotations("nbthread", "100000", AnnotationStatus::Added);
        let (_, config, _) = run(&handler, &anns, &Configuration::new());
        assert_eq!(
            config.get(Section::Global, "nbthread"),
            Some(&Directive::Int(available_threads()))
        );

        let anns = annotations("nbthread", "1", AnnotationStatus::Added);
        let (_, config, _) = run(&handler, &anns, &Configuration::new());
        assert_eq!(config.get(Section::Global, "nbthread"), Some(&Directive::Int(1)));
    }

    #[test]
    fn test_nbthread_unparsable_is_reported() {
        let handler = ScalarDirective::nbthread();
        let anns = annotations("nbthread", "four", AnnotationStatus::Added);
        let (result, _, dirty) = run(&handler, &anns, &Configuration::new());
        assert!(matches!(result, Err(ReconcileError::InvalidValue { .. })));
        assert!(!dirty);
    }

    #[test]
    fn test_timeout_units() {
        assert!(parse_timeout("5s").is_ok());
        assert!(parse_timeout("100ms").is_ok());
        assert!(parse_timeout("3000").is_ok());
        assert!(parse_timeout("1h").is_ok());
        assert!(parse_timeout("s5").is_err());
        assert!(parse_timeout("5 seconds").is_err());
        assert!(parse_timeout("").is_err());
    }

    #[test]
    fn test_log_format_quoted() {
        let handler = ScalarDirective::log_format();
        let anns = annotations("log-format", "%ci:%cp %ST", AnnotationStatus::Added);
        let (_, config, _) = run(&handler, &anns, &Configuration::new());
        assert_eq!(
            config.get(Section::Defaults, "log-format"),
            Some(&Directive::Text("'%ci:%cp %ST'".into()))
        );
    }
}
