//! Restart/reload classification.
//!
//! # States
//! - NoOp: nothing visible changed
//! - Reload: hot reload is enough
//! - Restart: the process must be relaunched
//!
//! # Design Decisions
//! - Flags only escalate within a pass (logical OR)
//! - Restart dominates reload when choosing the action

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::Serialize;

/// Aggregate effect of the mutations performed in a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RestartDecision {
    pub restart_requested: bool,
    pub reload_requested: bool,
}

impl RestartDecision {
    pub const NONE: RestartDecision = RestartDecision {
        restart_requested: false,
        reload_requested: false,
    };

    pub const RELOAD: RestartDecision = RestartDecision {
        restart_requested: false,
        reload_requested: true,
    };

    pub const RESTART: RestartDecision = RestartDecision {
        restart_requested: true,
        reload_requested: false,
    };

    /// Fold another contribution into this one.
    pub fn merge(&mut self, other: RestartDecision) {
        self.restart_requested |= other.restart_requested;
        self.reload_requested |= other.reload_requested;
    }

    pub fn is_none(&self) -> bool {
        !self.restart_requested && !self.reload_requested
    }
}

impl BitOr for RestartDecision {
    type Output = RestartDecision;

    fn bitor(mut self, rhs: RestartDecision) -> RestartDecision {
        self.merge(rhs);
        self
    }
}

impl BitOrAssign for RestartDecision {
    fn bitor_assign(&mut self, rhs: RestartDecision) {
        self.merge(rhs);
    }
}

/// What the caller should do with the proxy process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    NoOp,
    Reload,
    Restart,
}

impl Action {
    /// Choose the action for a decision. Modified frontend rule tables are
    /// regenerated into the running config, which takes a reload.
    pub fn classify(decision: RestartDecision, frontend_rules_modified: bool) -> Action {
        if decision.restart_requested {
            Action::Restart
        } else if decision.reload_requested || frontend_rules_modified {
            Action::Reload
        } else {
            Action::NoOp
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NoOp => "noop",
            Action::Reload => "reload",
            Action::Restart => "restart",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_only_escalate() {
        let mut decision = RestartDecision::NONE;
        decision |= RestartDecision::RELOAD;
        decision |= RestartDecision::NONE;
        assert!(decision.reload_requested);
        assert!(!decision.restart_requested);

        decision |= RestartDecision::RESTART;
        decision |= RestartDecision::NONE;
        assert_eq!(
            decision,
            RestartDecision {
                restart_requested: true,
                reload_requested: true
            }
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(Action::classify(RestartDecision::NONE, false), Action::NoOp);
        assert_eq!(Action::classify(RestartDecision::NONE, true), Action::Reload);
        assert_eq!(Action::classify(RestartDecision::RELOAD, false), Action::Reload);
        assert_eq!(
            Action::classify(RestartDecision::RELOAD | RestartDecision::RESTART, false),
            Action::Restart
        );
    }
}
