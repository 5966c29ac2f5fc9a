//! Application-wide error taxonomy.
//!
//! Domain errors carry a message specific to the rule that failed; the
//! `ErrorKind` groups them into categories callers branch on. Every
//! operation validates fully before assigning any field, so a returned
//! error always means nothing changed.

use serde::{Deserialize, Serialize};

/// Category of a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: bad code format, blank description, wrong currency.
    Validation,

    /// A structural guarantee would break: negative money, unbalanced entry,
    /// reserved account in a posting.
    InvariantViolation,

    /// The operation is not allowed from the current lifecycle state.
    StateTransition,

    /// A regulatory rule failed: missing invoice link on revenue, closing
    /// with unposted entries in range.
    ComplianceViolation,

    /// The audit chain does not verify: hash mismatch or broken link.
    IntegrityViolation,
}

impl ErrorKind {
    /// Returns the stable code for API responses and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::StateTransition => "STATE_TRANSITION_ERROR",
            Self::ComplianceViolation => "COMPLIANCE_VIOLATION",
            Self::IntegrityViolation => "INTEGRITY_VIOLATION",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
