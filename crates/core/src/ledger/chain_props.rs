//! Property-based tests for the ledger hash chain.
//!
//! These tests validate hash determinism, chain verification, and the
//! forensic guarantee that a single-field mutation is flagged at the
//! mutated record's index and never earlier.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use fiducia_shared::types::{AccountCode, Currency, JournalEntryId, Money, UserId};

use crate::journal::entry::{CreateEntryInput, JournalEntry};
use crate::journal::line::JournalLine;
use crate::ledger::chain::LedgerChain;
use crate::ledger::record::{compute_hash, LedgerRecord};
use crate::ledger::verify::IntegrityVerifier;

fn appended_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap()
}

fn make_posted_entry(document_number: &str) -> JournalEntry {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut entry = JournalEntry::create(
        CreateEntryInput {
            original_document_number: document_number.to_string(),
            original_document_date: date,
            entry_date: date,
            description: "Cash expense".to_string(),
            currency: Currency::Vnd,
        },
        date,
    )
    .unwrap();
    entry
        .add_line(
            JournalLine::debit(
                AccountCode::new("642").unwrap(),
                Money::new(Decimal::new(25000, 2), Currency::Vnd).unwrap(),
                "Expense",
            )
            .unwrap(),
        )
        .unwrap();
    entry
        .add_line(
            JournalLine::credit(
                AccountCode::new("111").unwrap(),
                Money::new(Decimal::new(25000, 2), Currency::Vnd).unwrap(),
                "Cash",
            )
            .unwrap(),
        )
        .unwrap();
    entry.post(UserId::new(), appended_at()).unwrap();
    entry
}

fn build_chain(length: usize) -> Vec<LedgerRecord> {
    let chain = LedgerChain::new();
    for i in 0..length {
        chain
            .append(
                &make_posted_entry(&format!("DOC-{i}")),
                UserId::new(),
                appended_at(),
            )
            .unwrap();
    }
    chain.records()
}

/// Strategy for an arbitrary append timestamp with microseconds.
fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (
        2020i32..2030,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0i64..1_000_000,
    )
        .prop_map(|(y, mo, d, h, mi, s, micros)| {
            Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap() + Duration::microseconds(micros)
        })
}

/// Which stored field a generated test mutates.
#[derive(Debug, Clone, Copy)]
enum MutatedField {
    EntryNumber,
    Timestamp,
    PreviousHash,
    DataSnapshot,
    Hash,
    CreatedBy,
}

fn arb_mutated_field() -> impl Strategy<Value = MutatedField> {
    prop_oneof![
        Just(MutatedField::EntryNumber),
        Just(MutatedField::Timestamp),
        Just(MutatedField::PreviousHash),
        Just(MutatedField::DataSnapshot),
        Just(MutatedField::Hash),
        Just(MutatedField::CreatedBy),
    ]
}

fn mutate(record: &mut LedgerRecord, field: MutatedField) {
    match field {
        MutatedField::EntryNumber => record.entry_number.push('x'),
        MutatedField::Timestamp => record.timestamp += Duration::microseconds(1),
        MutatedField::PreviousHash => {
            record.previous_hash = match record.previous_hash.take() {
                Some(mut hash) => {
                    hash.push('x');
                    Some(hash)
                }
                None => Some("x".repeat(64)),
            };
        }
        MutatedField::DataSnapshot => record.data_snapshot.push('x'),
        MutatedField::Hash => record.hash.push('0'),
        MutatedField::CreatedBy => record.created_by = UserId::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Hash determinism
    // =========================================================================

    /// The same preimage fields always hash to the same digest, and any
    /// single field change produces a different one.
    #[test]
    fn prop_hash_depends_on_every_field(
        sequence in 1u64..100_000,
        timestamp in arb_timestamp(),
        entry_number in "JE-[0-9]{6}-[a-f0-9]{8}",
        previous in prop::option::of("[a-f0-9]{64}"),
        snapshot in "\\{\"k\":[0-9]{1,6}\\}",
    ) {
        let entry_id = JournalEntryId::new();
        let user = UserId::new();

        let base = compute_hash(
            sequence, timestamp, entry_id, &entry_number,
            previous.as_deref(), &snapshot, user,
        );
        let again = compute_hash(
            sequence, timestamp, entry_id, &entry_number,
            previous.as_deref(), &snapshot, user,
        );
        prop_assert_eq!(&base, &again);
        prop_assert_eq!(base.len(), 64);

        let bumped_sequence = compute_hash(
            sequence + 1, timestamp, entry_id, &entry_number,
            previous.as_deref(), &snapshot, user,
        );
        prop_assert_ne!(&base, &bumped_sequence);

        let bumped_time = compute_hash(
            sequence, timestamp + Duration::microseconds(1), entry_id,
            &entry_number, previous.as_deref(), &snapshot, user,
        );
        prop_assert_ne!(&base, &bumped_time);

        let other_snapshot = format!("{snapshot} ");
        let bumped_snapshot = compute_hash(
            sequence, timestamp, entry_id, &entry_number,
            previous.as_deref(), &other_snapshot, user,
        );
        prop_assert_ne!(&base, &bumped_snapshot);

        let bumped_user = compute_hash(
            sequence, timestamp, entry_id, &entry_number,
            previous.as_deref(), &snapshot, UserId::new(),
        );
        prop_assert_ne!(&base, &bumped_user);
    }

    // =========================================================================
    // Chains built by the append service always verify
    // =========================================================================

    /// Sequential appends produce a chain that passes every check, with
    /// gapless 1-based sequences and adjacent hash links.
    #[test]
    fn prop_appended_chains_always_verify(length in 0usize..8) {
        let records = build_chain(length);

        prop_assert_eq!(records.len(), length);
        prop_assert!(IntegrityVerifier::verify_chain(&records));
        prop_assert!(IntegrityVerifier::detect_tampering(&records).is_empty());

        let mut expected = 1u64;
        for record in &records {
            prop_assert_eq!(record.sequence_number, expected);
            prop_assert!(record.verify_integrity());
            expected += 1;
        }
        for pair in records.windows(2) {
            prop_assert_eq!(
                pair[1].previous_hash.as_ref(),
                Some(&pair[0].hash)
            );
        }
    }

    // =========================================================================
    // A single-field mutation is flagged at its own index, never earlier
    // =========================================================================

    /// Mutating one stored field of one record makes verification fail
    /// and places the first finding at exactly that record's index.
    #[test]
    fn prop_single_mutation_flagged_at_exact_index(
        length in 2usize..6,
        target in 0usize..6,
        field in arb_mutated_field(),
    ) {
        let mut records = build_chain(length);
        let target = target % length;
        mutate(&mut records[target], field);

        prop_assert!(!IntegrityVerifier::verify_chain(&records));

        let findings = IntegrityVerifier::detect_tampering(&records);
        prop_assert!(!findings.is_empty());

        let first_flagged = findings
            .iter()
            .map(|finding| finding.index)
            .min()
            .unwrap();
        prop_assert_eq!(first_flagged, target);
    }

    /// After a mid-chain snapshot edit, the longest valid prefix ends
    /// right before the edited record.
    #[test]
    fn prop_last_valid_record_precedes_mutation(
        length in 2usize..6,
        target in 0usize..6,
    ) {
        let mut records = build_chain(length);
        let target = target % length;
        records[target].data_snapshot.push('x');

        let last_valid = IntegrityVerifier::find_last_valid_record(&records);
        if target == 0 {
            prop_assert!(last_valid.is_none());
        } else {
            prop_assert_eq!(last_valid.unwrap().id, records[target - 1].id);
        }
    }
}

// =========================================================================
// Unit tests for edge cases
// =========================================================================

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_single_record_chain_verifies() {
        let records = build_chain(1);
        assert!(IntegrityVerifier::verify_chain(&records));
        assert_eq!(
            IntegrityVerifier::find_last_valid_record(&records)
                .unwrap()
                .sequence_number,
            1
        );
    }

    #[test]
    fn test_missing_previous_hash_hashes_like_the_literal_placeholder() {
        // The preimage renders an absent previous hash as the string
        // "null"; the two spellings are equivalent by construction.
        let entry_id = JournalEntryId::new();
        let user = UserId::new();
        let absent = compute_hash(1, appended_at(), entry_id, "JE-x", None, "{}", user);
        let literal = compute_hash(1, appended_at(), entry_id, "JE-x", Some("null"), "{}", user);
        assert_eq!(absent, literal);
    }

    #[test]
    fn test_cancelling_an_entry_after_append_leaves_its_record_valid() {
        let chain = LedgerChain::new();
        let mut original = make_posted_entry("DOC-1");
        chain
            .append(&original, UserId::new(), appended_at())
            .unwrap();

        // Reverse the original; its reversal posts and gets appended too.
        let outcome = original
            .create_reversal("JE-202401-reversal", "Wrong amount", UserId::new(), appended_at())
            .unwrap();
        let mut reversal = outcome.reversal;
        reversal.post(UserId::new(), appended_at()).unwrap();
        chain
            .append(&reversal, UserId::new(), appended_at())
            .unwrap();

        // The frozen snapshot keeps the original's posted state; the
        // chain stays fully valid.
        let records = chain.records();
        assert_eq!(records.len(), 2);
        assert!(IntegrityVerifier::verify_chain(&records));
        assert_eq!(records[1].previous_hash, Some(records[0].hash.clone()));
    }
}
