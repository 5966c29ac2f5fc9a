//! Journal entry state machine.
//!
//! This module implements the double-entry journal:
//! - Entry lines bound to validated accounts and positive amounts
//! - The entry aggregate with its Draft → Posted → Cancelled lifecycle
//! - Reversal creation with swapped debit/credit lines
//! - Error types for journal operations

pub mod entry;
pub mod error;
pub mod line;


pub use entry::{
    CreateEntryInput, EntryChange, EntryStatus, EntryTotals, JournalEntry, ReversalOutcome,
};
pub use error::JournalError;
pub use line::{JournalLine, Side};
