//! Error types for reconciliation handlers.

use thiserror::Error;

use crate::rules::RuleError;

/// Result type alias for handler operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors a single directive handler can report. None of them abort a pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Scalar value could not be converted to its directive type.
    #[error("invalid value {value:?} for annotation {annotation}: {reason}")]
    InvalidValue {
        annotation: String,
        value: String,
        reason: String,
    },

    /// Address list token is neither an IP address nor a CIDR.
    #[error("incorrect value for {annotation} annotation: {token:?} is not an IP address or CIDR")]
    InvalidAddress { annotation: String, token: String },

    /// Address list contains no tokens.
    #[error("incorrect value for {annotation} annotation: no address given")]
    EmptyAddressList { annotation: String },

    /// Rule slot access failed.
    #[error("rule table error: {0}")]
    Rule(#[from] RuleError),
}
