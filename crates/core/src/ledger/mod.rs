//! Tamper-evident audit ledger.
//!
//! This module implements the append-only hash chain:
//! - Immutable records snapshotting each posted entry
//! - An append service owning the sequence counter and chain tail
//! - Read-only verification and forensic tamper reporting
//! - Error types for append failures and chain violations

pub mod chain;
pub mod error;
pub mod record;
pub mod verify;

#[cfg(test)]
mod chain_props;

pub use chain::LedgerChain;
pub use error::{ChainViolation, LedgerError};
pub use record::{compute_hash, EntrySnapshot, LedgerRecord, SnapshotLine};
pub use verify::{IntegrityVerifier, TamperFinding};
