//! Ledger error types for append failures and chain violations.

use thiserror::Error;

use fiducia_shared::ErrorKind;

use crate::journal::entry::EntryStatus;

/// Errors that can occur while appending to the audit ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== State Errors ==========
    /// Only posted entries can be recorded in the ledger.
    #[error("Only posted entries can be recorded in the ledger (status: {status})")]
    EntryNotPosted {
        /// The current status of the rejected entry.
        status: EntryStatus,
    },

    // ========== Snapshot Errors ==========
    /// The entry snapshot failed to serialize.
    #[error("Failed to serialize entry snapshot: {0}")]
    SnapshotFailed(#[from] serde_json::Error),
}

impl LedgerError {
    /// Returns the taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EntryNotPosted { .. } => ErrorKind::StateTransition,
            Self::SnapshotFailed(_) => ErrorKind::InvariantViolation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EntryNotPosted { .. } => "ENTRY_NOT_POSTED",
            Self::SnapshotFailed(_) => "SNAPSHOT_FAILED",
        }
    }
}

/// One way a stored record can contradict the chain.
///
/// Surfaced only by the read-side verifier. Appends never raise these;
/// tampering is detected after the fact, not prevented at write time.
#[derive(Debug, Clone, Error)]
pub enum ChainViolation {
    /// The record's stored hash does not match a recomputation from its
    /// own fields.
    #[error("stored hash does not match the recomputed hash")]
    HashMismatch,

    /// The record does not link to its predecessor's hash.
    #[error("previous-hash link is broken (expected {expected}, found {found})")]
    BrokenLink {
        /// The predecessor's hash, or "null" for the first record.
        expected: String,
        /// The hash the record actually points at, or "null".
        found: String,
    },

    /// The record's sequence number does not match its chain position.
    #[error("sequence number {sequence} does not match chain position {position}")]
    SequenceOutOfOrder {
        /// The stored sequence number.
        sequence: u64,
        /// The 1-based position in chain order.
        position: u64,
    },
}

impl ChainViolation {
    /// Returns the taxonomy kind for this violation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::HashMismatch | Self::BrokenLink { .. } | Self::SequenceOutOfOrder { .. } => {
                ErrorKind::IntegrityViolation
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::HashMismatch => "HASH_MISMATCH",
            Self::BrokenLink { .. } => "BROKEN_LINK",
            Self::SequenceOutOfOrder { .. } => "SEQUENCE_OUT_OF_ORDER",
        }
    }
}
