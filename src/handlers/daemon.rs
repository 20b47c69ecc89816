//! Daemon-mode coupling to log output.
//!
//! Logging to standard output requires the proxy to run in the foreground,
//! any other target runs it as a daemon. Toggling the mode changes how the
//! process is launched, so a mismatch asks for a restart.
//!
//! ```text
//! stdout target | daemon present | action
//! --------------+----------------+-------------------------
//! yes           | yes            | delete daemon, restart
//! no            | no             | insert daemon, restart
//! yes           | no             | none
//! no            | yes            | none
//! ```

use crate::haproxy::{Directive, Section, Transaction};
use crate::reconcile::RestartDecision;

const DAEMON_KEY: &str = "daemon";

/// Whether daemon mode is currently enabled in the transaction.
pub fn daemon_enabled(txn: &Transaction) -> bool {
    txn.get(Section::Global, DAEMON_KEY).is_some()
}

/// Reconcile daemon mode with whether any log target writes to stdout.
pub fn couple(txn: &mut Transaction, logs_to_stdout: bool) -> RestartDecision {
    match (logs_to_stdout, daemon_enabled(txn)) {
        (true, true) => {
            txn.delete(Section::Global, DAEMON_KEY);
            tracing::info!("Logging to stdout, disabling daemon mode");
            RestartDecision::RESTART
        }
        (false, false) => {
            txn.insert(Section::Global, DAEMON_KEY, Directive::Enabled, 0);
            tracing::info!("No stdout log target, enabling daemon mode");
            RestartDecision::RESTART
        }
        _ => RestartDecision::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haproxy::Configuration;

    #[test]
    fn test_stdout_with_daemon_restarts() {
        let mut txn = Configuration::baseline().begin();
        assert_eq!(couple(&mut txn, true), RestartDecision::RESTART);
        assert!(!daemon_enabled(&txn));
    }

    #[test]
    fn test_network_without_daemon_restarts() {
        let mut txn = Configuration::new().begin();
        assert_eq!(couple(&mut txn, false), RestartDecision::RESTART);
        assert!(daemon_enabled(&txn));
    }

    #[test]
    fn test_matching_modes_untouched() {
        let mut txn = Configuration::baseline().begin();
        assert_eq!(couple(&mut txn, false), RestartDecision::NONE);
        assert!(daemon_enabled(&txn));
        assert!(!txn.has_changes());

        let mut txn = Configuration::new().begin();
        assert_eq!(couple(&mut txn, true), RestartDecision::NONE);
        assert!(!daemon_enabled(&txn));
        assert!(!txn.has_changes());
    }
}
