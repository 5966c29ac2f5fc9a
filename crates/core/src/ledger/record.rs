//! Immutable audit ledger records and their content hash.
//!
//! Each record freezes one posted journal entry into a canonical JSON
//! snapshot and chains it to its predecessor by hash. A record is
//! created once per successful post and never mutated or deleted.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use fiducia_shared::types::{Currency, JournalEntryId, LedgerRecordId, UserId};

use crate::journal::entry::JournalEntry;
use crate::journal::line::Side;

/// One audit ledger record, hash-linked to its predecessor.
///
/// The stored `hash` is a deterministic function of every other field,
/// so any retroactive edit is detectable by recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Record ID.
    pub id: LedgerRecordId,
    /// The posted journal entry this record freezes.
    pub journal_entry_id: JournalEntryId,
    /// The entry's human-readable number.
    pub entry_number: String,
    /// Global 1-based position in the chain, gapless and monotonic.
    pub sequence_number: u64,
    /// When the record was appended.
    pub timestamp: DateTime<Utc>,
    /// The preceding record's hash; None only for the first record.
    pub previous_hash: Option<String>,
    /// Canonical JSON snapshot of the posted entry.
    pub data_snapshot: String,
    /// Lowercase-hex SHA-256 over the record's other fields.
    pub hash: String,
    /// The user on whose behalf the record was appended.
    pub created_by: UserId,
}

impl LedgerRecord {
    /// Recomputes the hash from the record's own stored fields and
    /// compares it with the stored hash.
    #[must_use]
    pub fn verify_integrity(&self) -> bool {
        let recomputed = compute_hash(
            self.sequence_number,
            self.timestamp,
            self.journal_entry_id,
            &self.entry_number,
            self.previous_hash.as_deref(),
            &self.data_snapshot,
            self.created_by,
        );
        recomputed == self.hash
    }
}

/// Canonical snapshot of a posted entry's header fields and lines.
///
/// Field order is declaration order under `serde_json`, and lines keep
/// entry order, so the same entry always renders the same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    /// The entry's human-readable number.
    pub entry_number: String,
    /// The business date the entry books under.
    pub entry_date: NaiveDate,
    /// The source document number.
    pub original_document_number: String,
    /// The date on the source document.
    pub original_document_date: NaiveDate,
    /// The entry description.
    pub description: String,
    /// The entry currency.
    pub currency: Currency,
    /// Who posted the entry.
    pub posted_by: Option<UserId>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// The entry lines in booking order.
    pub lines: Vec<SnapshotLine>,
}

/// One line inside an [`EntrySnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// The account the line books against.
    pub account: String,
    /// Which side the line books on.
    pub side: Side,
    /// The booked amount.
    pub amount: Decimal,
    /// The line description.
    pub description: String,
}

impl EntrySnapshot {
    /// Captures the entry's current state.
    #[must_use]
    pub fn of(entry: &JournalEntry) -> Self {
        Self {
            entry_number: entry.entry_number().to_string(),
            entry_date: entry.entry_date(),
            original_document_number: entry.original_document_number().to_string(),
            original_document_date: entry.original_document_date(),
            description: entry.description().to_string(),
            currency: entry.currency(),
            posted_by: entry.posted_by(),
            posted_at: entry.posted_at(),
            lines: entry
                .lines()
                .iter()
                .map(|line| SnapshotLine {
                    account: line.account().as_str().to_string(),
                    side: line.side(),
                    amount: line.amount().amount(),
                    description: line.description().to_string(),
                })
                .collect(),
        }
    }
}

/// Computes the record hash: lowercase-hex SHA-256 over the `|`-joined
/// preimage `sequence | timestamp | journal_entry_id | entry_number |
/// previous_hash-or-"null" | data_snapshot | created_by`, with the
/// timestamp rendered as RFC 3339 with microseconds and a `Z` suffix.
#[must_use]
pub fn compute_hash(
    sequence_number: u64,
    timestamp: DateTime<Utc>,
    journal_entry_id: JournalEntryId,
    entry_number: &str,
    previous_hash: Option<&str>,
    data_snapshot: &str,
    created_by: UserId,
) -> String {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);
    let previous = previous_hash.unwrap_or("null");
    let preimage = format!(
        "{sequence_number}|{timestamp}|{journal_entry_id}|{entry_number}|{previous}|{data_snapshot}|{created_by}"
    );
    hex::encode(Sha256::digest(preimage.as_bytes()))
}
