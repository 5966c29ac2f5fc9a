//! Read-only chain verification and forensic tamper reporting.
//!
//! The verifier never mutates the chain. It operates on record slices
//! (typically a [`LedgerChain::records`] snapshot) so concurrent appends
//! cannot produce a false tampering report mid-walk.
//!
//! [`LedgerChain::records`]: crate::ledger::chain::LedgerChain::records

use std::fmt;

use crate::ledger::error::ChainViolation;
use crate::ledger::record::LedgerRecord;

/// One violation located in the chain, for forensic reporting.
#[derive(Debug, Clone)]
pub struct TamperFinding {
    /// 0-based index of the record in sequence order.
    pub index: usize,
    /// The record's stored sequence number.
    pub sequence_number: u64,
    /// What the record contradicts.
    pub violation: ChainViolation,
}

impl fmt::Display for TamperFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record at index {} (sequence {}): {}",
            self.index, self.sequence_number, self.violation
        )
    }
}

/// Stateless verification over ledger record slices.
///
/// A chain is valid when every record in sequence order (a) recomputes
/// to its stored hash, (b) links to its predecessor's hash (None only
/// for the first record), and (c) carries a sequence number equal to
/// its 1-based position. No gaps, no duplicates.
pub struct IntegrityVerifier;

impl IntegrityVerifier {
    /// Recomputes one record's hash and compares it with the stored one.
    #[must_use]
    pub fn verify_integrity(record: &LedgerRecord) -> bool {
        record.verify_integrity()
    }

    /// Returns true only if every record passes all three chain checks.
    #[must_use]
    pub fn verify_chain(records: &[LedgerRecord]) -> bool {
        let mut position: u64 = 1;
        let mut previous: Option<&LedgerRecord> = None;
        for record in Self::ordered(records) {
            if !Self::record_violations(record, previous, position).is_empty() {
                return false;
            }
            previous = Some(record);
            position += 1;
        }
        true
    }

    /// Walks the whole chain without short-circuiting and collects every
    /// violation with its location.
    #[must_use]
    pub fn detect_tampering(records: &[LedgerRecord]) -> Vec<TamperFinding> {
        let mut findings = Vec::new();
        let mut position: u64 = 1;
        let mut previous: Option<&LedgerRecord> = None;
        for (index, record) in Self::ordered(records).into_iter().enumerate() {
            for violation in Self::record_violations(record, previous, position) {
                findings.push(TamperFinding {
                    index,
                    sequence_number: record.sequence_number,
                    violation,
                });
            }
            previous = Some(record);
            position += 1;
        }
        findings
    }

    /// Walks forward in sequence order and returns the record before the
    /// first one whose hash fails to recompute.
    ///
    /// Returns the last record when the whole chain verifies, and None
    /// when the first record already fails or the slice is empty.
    #[must_use]
    pub fn find_last_valid_record(records: &[LedgerRecord]) -> Option<&LedgerRecord> {
        let mut last_valid = None;
        for record in Self::ordered(records) {
            if !record.verify_integrity() {
                break;
            }
            last_valid = Some(record);
        }
        last_valid
    }

    /// Returns the records sorted by sequence number.
    fn ordered(records: &[LedgerRecord]) -> Vec<&LedgerRecord> {
        let mut ordered: Vec<&LedgerRecord> = records.iter().collect();
        ordered.sort_by_key(|record| record.sequence_number);
        ordered
    }

    /// Checks one record against its predecessor and expected position.
    fn record_violations(
        record: &LedgerRecord,
        previous: Option<&LedgerRecord>,
        position: u64,
    ) -> Vec<ChainViolation> {
        let mut violations = Vec::new();

        if !record.verify_integrity() {
            violations.push(ChainViolation::HashMismatch);
        }

        match (previous, &record.previous_hash) {
            (None, None) => {}
            (None, Some(found)) => violations.push(ChainViolation::BrokenLink {
                expected: "null".to_string(),
                found: found.clone(),
            }),
            (Some(prev), None) => violations.push(ChainViolation::BrokenLink {
                expected: prev.hash.clone(),
                found: "null".to_string(),
            }),
            (Some(prev), Some(found)) => {
                if *found != prev.hash {
                    violations.push(ChainViolation::BrokenLink {
                        expected: prev.hash.clone(),
                        found: found.clone(),
                    });
                }
            }
        }

        if record.sequence_number != position {
            violations.push(ChainViolation::SequenceOutOfOrder {
                sequence: record.sequence_number,
                position,
            });
        }

        violations
    }
}
