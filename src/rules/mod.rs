//! Frontend rule tables.
//!
//! # Data Flow
//! ```text
//! Start of pass: FrontendRules::new() (fresh, empty slots)
//!     → handlers overwrite fixed rule slots
//!     → handlers flag the owning protocol table as modified
//! End of pass: caller regenerates frontend rules for modified tables
//! ```

pub mod slot;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use slot::{RuleError, RuleSlot};

/// Frontend protocol a rule table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Http,
}

/// Frontends the TCP rule tables are rendered into.
pub const FRONTENDS: [&str; 2] = ["http", "https"];

/// Fixed-purpose TCP rule slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TcpRuleType {
    ProxyProtocol,
}

impl TcpRuleType {
    pub const ALL: [TcpRuleType; 1] = [TcpRuleType::ProxyProtocol];

    pub fn capacity(self) -> usize {
        match self {
            TcpRuleType::ProxyProtocol => 1,
        }
    }
}

/// A `tcp-request` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcpRequestRule {
    pub index: usize,
    pub kind: String,
    pub action: String,
    pub cond: String,
    pub cond_test: String,
}

impl fmt::Display for TcpRequestRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp-request {} {}", self.kind, self.action)?;
        if !self.cond.is_empty() {
            write!(f, " {} {}", self.cond, self.cond_test)?;
        }
        Ok(())
    }
}

/// Per-pass frontend rule state.
#[derive(Debug, Clone, Serialize)]
pub struct FrontendRules {
    tcp: BTreeMap<TcpRuleType, RuleSlot<TcpRequestRule>>,
    modified: BTreeMap<Protocol, bool>,
}

impl FrontendRules {
    pub fn new() -> Self {
        let tcp = TcpRuleType::ALL
            .iter()
            .map(|t| (*t, RuleSlot::with_capacity(t.capacity())))
            .collect();
        Self {
            tcp,
            modified: BTreeMap::new(),
        }
    }

    pub fn tcp_slot(&self, rule_type: TcpRuleType) -> Option<&RuleSlot<TcpRequestRule>> {
        self.tcp.get(&rule_type)
    }

    pub fn tcp_slot_mut(&mut self, rule_type: TcpRuleType) -> &mut RuleSlot<TcpRequestRule> {
        self.tcp
            .entry(rule_type)
            .or_insert_with(|| RuleSlot::with_capacity(rule_type.capacity()))
    }

    pub fn mark_modified(&mut self, protocol: Protocol) {
        self.modified.insert(protocol, true);
    }

    pub fn is_modified(&self, protocol: Protocol) -> bool {
        self.modified.get(&protocol).copied().unwrap_or(false)
    }

    pub fn any_modified(&self) -> bool {
        self.modified.values().any(|m| *m)
    }

    /// All TCP rules, grouped by slot in declaration order.
    pub fn tcp_rules(&self) -> Vec<&TcpRequestRule> {
        self.tcp.values().flat_map(|slot| slot.rules()).collect()
    }

    /// Replace one TCP slot with its content from `previous`.
    pub fn restore_tcp_slot(&mut self, previous: &FrontendRules, rule_type: TcpRuleType) {
        let slot = previous
            .tcp_slot(rule_type)
            .cloned()
            .unwrap_or_else(|| RuleSlot::with_capacity(rule_type.capacity()));
        self.tcp.insert(rule_type, slot);
    }

    /// Render the TCP rules as one block per frontend. Empty when there are no rules.
    pub fn render(&self) -> String {
        let rules = self.tcp_rules();
        if rules.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for frontend in FRONTENDS {
            out.push_str("frontend ");
            out.push_str(frontend);
            out.push('\n');
            for rule in &rules {
                out.push_str("  ");
                out.push_str(&rule.to_string());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

impl Default for FrontendRules {
    fn default() -> Self {
        Self::new()
    }
}
