//! Log target (`syslog-server`) handler.
//!
//! # Responsibilities
//! - Parse one log target per line of `key:value` fields
//! - Replace every `log` directive of the global section with the parsed targets
//! - Hand the parsed targets to the daemon-mode coupler
//!
//! # Design Decisions
//! - Malformed tokens and unknown keys are skipped, siblings still apply
//! - A line without an `address` field yields no target
//! - Full replacement: previous targets are removed before inserting

use crate::annotations::AnnotationStatus;
use crate::error::Result;
use crate::handlers::daemon;
use crate::handlers::{AnnotationHandler, PassContext};
use crate::haproxy::{Directive, LogTarget, Section};
use crate::reconcile::RestartDecision;

const ANNOTATION: &str = "syslog-server";
const LOG_KEY: &str = "log";

/// A target parsed from one input line, with the line position it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTarget {
    pub line: usize,
    pub target: LogTarget,
}

/// Parse a multi-line list of log targets.
///
/// Targets are returned in input order.
pub fn parse_log_targets(input: &str) -> Vec<ParsedTarget> {
    input
        .lines()
        .enumerate()
        .filter_map(|(line, raw)| {
            let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if compact.is_empty() {
                return None;
            }
            parse_line(&compact).map(|target| ParsedTarget { line, target })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<LogTarget> {
    let mut fields: Vec<(String, &str)> = Vec::new();
    for token in line.split(',') {
        match token.split_once(':') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                fields.push((key.to_ascii_lowercase(), value));
            }
            _ => {
                tracing::warn!(param = %token, "Incorrect syslog param");
            }
        }
    }

    let Some(address) = fields
        .iter()
        .rev()
        .find(|(key, _)| key == "address")
        .map(|(_, value)| *value)
    else {
        tracing::warn!(line = %line, "Syslog target without address, skipping");
        return None;
    };

    let mut target = LogTarget {
        address: address.to_string(),
        ..LogTarget::default()
    };
    let mut port = None;
    for (key, value) in &fields {
        match key.as_str() {
            "address" => {}
            "port" => port = Some(*value),
            "length" => match value.parse::<i64>() {
                Ok(length) => target.length = Some(length),
                Err(_) => tracing::warn!(length = %value, "Invalid syslog length, ignoring"),
            },
            "format" => target.format = Some(value.to_string()),
            "facility" => target.facility = Some(value.to_string()),
            "level" | "minlevel" => target.level = Some(value.to_string()),
            _ => tracing::warn!(param = %key, "Unknown syslog param"),
        }
    }

    if let Some(port) = port {
        if !target.is_stdout() {
            target.address = format!("{}:{}", target.address, port);
        }
    }
    Some(target)
}

/// Applies the `syslog-server` annotation and couples daemon mode to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyslogServer;

impl AnnotationHandler for SyslogServer {
    fn annotation(&self) -> &str {
        ANNOTATION
    }

    fn update(&self, ctx: &mut PassContext<'_>) -> Result<RestartDecision> {
        let Some(ann) = ctx.annotations.resolve(ANNOTATION) else {
            return Ok(RestartDecision::NONE);
        };

        let targets = match ann.status {
            AnnotationStatus::Empty => return Ok(RestartDecision::NONE),
            AnnotationStatus::Deleted => Vec::new(),
            AnnotationStatus::Added | AnnotationStatus::Modified => parse_log_targets(&ann.value),
        };

        let mut decision = apply_log_targets(ctx, &targets);
        let stdout = targets.iter().any(|t| t.target.is_stdout());
        decision |= daemon::couple(ctx.transaction, stdout);
        Ok(decision)
    }
}

fn apply_log_targets(ctx: &mut PassContext<'_>, targets: &[ParsedTarget]) -> RestartDecision {
    ctx.transaction.set(Section::Global, LOG_KEY, None);
    for parsed in targets {
        tracing::info!(target_address = %parsed.target.address, "Configuring log target");
        ctx.transaction.insert(
            Section::Global,
            LOG_KEY,
            Directive::Log(parsed.target.clone()),
            parsed.line,
        );
    }
    RestartDecision::RELOAD
}
