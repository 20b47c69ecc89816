//! Proxy-protocol rule handler.
//!
//! # Responsibilities
//! - Validate a comma/whitespace separated list of IP addresses and CIDRs
//! - Write the single `expect-proxy` rule of the proxy-protocol slot
//! - Flag the TCP rule table as modified when the annotation changed
//!
//! # Design Decisions
//! - Validation is all-or-nothing: one bad token rejects the annotation
//! - The rule slot is rebuilt every pass, so an unchanged annotation still
//!   writes its rule without flagging the table

use std::net::IpAddr;

use crate::annotations::AnnotationStatus;
use crate::error::{ReconcileError, Result};
use crate::handlers::{AnnotationHandler, PassContext};
use crate::reconcile::RestartDecision;
use crate::rules::{Protocol, TcpRequestRule, TcpRuleType};

const ANNOTATION: &str = "proxy-protocol";
const RULE_INDEX: usize = 0;

/// Validated source address set, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAddressSet {
    tokens: Vec<String>,
}

impl NetworkAddressSet {
    /// Parse and validate an address list. Fails on the first invalid token.
    pub fn parse(value: &str) -> Result<Self> {
        let tokens: Vec<String> = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if tokens.is_empty() {
            return Err(ReconcileError::EmptyAddressList {
                annotation: ANNOTATION.to_string(),
            });
        }
        if let Some(bad) = tokens.iter().find(|t| !is_address_or_cidr(t)) {
            return Err(ReconcileError::InvalidAddress {
                annotation: ANNOTATION.to_string(),
                token: bad.clone(),
            });
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// `tcp-request connection expect-proxy layer4` rule matching this set.
    pub fn to_rule(&self) -> TcpRequestRule {
        TcpRequestRule {
            index: RULE_INDEX,
            kind: "connection".to_string(),
            action: "expect-proxy layer4".to_string(),
            cond: "if".to_string(),
            cond_test: format!("{{ src {} }}", self.tokens.join(" ")),
        }
    }
}

fn is_address_or_cidr(token: &str) -> bool {
    if token.parse::<IpAddr>().is_ok() {
        return true;
    }
    let Some((addr, prefix)) = token.split_once('/') else {
        return false;
    };
    let Ok(addr) = addr.parse::<IpAddr>() else {
        return false;
    };
    let max = if addr.is_ipv4() { 32 } else { 128 };
    !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_digit())
        && prefix.parse::<u8>().map(|p| p <= max).unwrap_or(false)
}

/// Applies the `proxy-protocol` annotation to the TCP rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyProtocol;

impl AnnotationHandler for ProxyProtocol {
    fn annotation(&self) -> &str {
        ANNOTATION
    }

    fn tcp_slots(&self) -> &[TcpRuleType] {
        &[TcpRuleType::ProxyProtocol]
    }

    fn update(&self, ctx: &mut PassContext<'_>) -> Result<RestartDecision> {
        let Some(ann) = ctx.annotations.resolve(ANNOTATION) else {
            return Ok(RestartDecision::NONE);
        };

        if ann.status == AnnotationStatus::Deleted {
            tracing::debug!("Deleting proxy-protocol configuration");
            ctx.frontend_rules
                .tcp_slot_mut(TcpRuleType::ProxyProtocol)
                .clear(RULE_INDEX)?;
            ctx.frontend_rules.mark_modified(Protocol::Tcp);
            return Ok(RestartDecision::NONE);
        }

        let addresses = NetworkAddressSet::parse(&ann.value).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejecting proxy-protocol annotation");
        })?;

        if ann.status != AnnotationStatus::Empty {
            tracing::debug!(sources = %addresses.tokens().join(" "), "Configuring proxy-protocol");
            ctx.frontend_rules.mark_modified(Protocol::Tcp);
        }
        ctx.frontend_rules
            .tcp_slot_mut(TcpRuleType::ProxyProtocol)
            .set(RULE_INDEX, addresses.to_rule())?;

        Ok(RestartDecision::NONE)
    }
}
