//! Append-only ledger chain with an atomic sequence/tail assignment.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use fiducia_shared::types::{LedgerRecordId, UserId};

use crate::journal::entry::{EntryStatus, JournalEntry};
use crate::ledger::error::LedgerError;
use crate::ledger::record::{compute_hash, EntrySnapshot, LedgerRecord};

/// The append side of the audit ledger.
///
/// Owns the sequence counter and the chain tail as private state behind
/// one mutex. The whole append runs under a single lock acquisition, so
/// two concurrent appends can never share a sequence number and every
/// record's `previous_hash` references the immediately preceding record.
///
/// Readers get cloned snapshots; a verification walk over a snapshot is
/// unaffected by appends that land after it was taken.
#[derive(Debug)]
pub struct LedgerChain {
    records: Mutex<Vec<LedgerRecord>>,
}

impl LedgerChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends one record for a posted entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotPosted` for draft or cancelled entries and
    /// `SnapshotFailed` if the entry snapshot cannot be serialized.
    pub fn append(
        &self,
        entry: &JournalEntry,
        created_by: UserId,
        appended_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        if entry.status() != EntryStatus::Posted {
            return Err(LedgerError::EntryNotPosted {
                status: entry.status(),
            });
        }

        let mut records = self.records.lock();

        let data_snapshot = serde_json::to_string(&EntrySnapshot::of(entry))?;
        let sequence_number = records.last().map_or(1, |tail| tail.sequence_number + 1);
        let previous_hash = records.last().map(|tail| tail.hash.clone());
        let hash = compute_hash(
            sequence_number,
            appended_at,
            entry.id(),
            entry.entry_number(),
            previous_hash.as_deref(),
            &data_snapshot,
            created_by,
        );

        let record = LedgerRecord {
            id: LedgerRecordId::new(),
            journal_entry_id: entry.id(),
            entry_number: entry.entry_number().to_string(),
            sequence_number,
            timestamp: appended_at,
            previous_hash,
            data_snapshot,
            hash,
            created_by,
        };
        records.push(record.clone());
        Ok(record)
    }

    /// Returns a cloned snapshot of the chain in append order.
    #[must_use]
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.records.lock().clone()
    }

    /// Returns how many records the chain holds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Returns the current tail record's hash, if any.
    #[must_use]
    pub fn tail_hash(&self) -> Option<String> {
        self.records.lock().last().map(|tail| tail.hash.clone())
    }
}

impl Default for LedgerChain {
    fn default() -> Self {
        Self::new()
    }
}
