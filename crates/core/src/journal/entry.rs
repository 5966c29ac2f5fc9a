//! Journal entry aggregate and its lifecycle state machine.
//!
//! Entries are created Draft, accumulate lines, then Post exactly once.
//! Posting validates the double-entry balance and the revenue/invoice
//! compliance rule before any field changes. A posted entry is immutable;
//! correcting it means creating a reversal entry and cancelling the
//! original. Every mutating call returns a typed change descriptor for
//! the caller's audit trail.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use fiducia_shared::types::{AccountCode, Currency, InvoiceId, JournalEntryId, Money, UserId};

use crate::journal::error::JournalError;
use crate::journal::line::{JournalLine, Side};

/// Journal entry status in the posting lifecycle.
///
/// Valid transitions:
/// - Draft → Posted (post)
/// - Posted → Cancelled (reversal creation, which also spawns a new Draft)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been cancelled by a reversal (immutable).
    Cancelled,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the entry can be modified.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryInput {
    /// Number of the source document (invoice, receipt, contract).
    pub original_document_number: String,
    /// Date on the source document.
    pub original_document_date: NaiveDate,
    /// Business date the entry books under.
    pub entry_date: NaiveDate,
    /// What the entry records.
    pub description: String,
    /// Currency every line of the entry must use.
    pub currency: Currency,
}

/// Change descriptor returned by each mutating entry operation.
///
/// Captures the who/when/what of the mutation for the caller's audit
/// trail; the aggregate keeps no internal event buffer.
#[derive(Debug, Clone)]
pub enum EntryChange {
    /// A line was added to a draft entry.
    LineAdded {
        /// The account the line posts to.
        account: AccountCode,
        /// The side of the new line.
        side: Side,
        /// The positive amount of the new line.
        amount: Money,
    },
    /// A draft entry was linked to its source invoice.
    InvoiceLinked {
        /// The linked invoice.
        invoice: InvoiceId,
    },
    /// A draft entry was posted.
    Posted {
        /// The user who posted the entry.
        posted_by: UserId,
        /// When the entry was posted.
        posted_at: DateTime<Utc>,
    },
    /// A posted entry was cancelled by a reversal.
    Cancelled {
        /// The user who cancelled the entry.
        cancelled_by: UserId,
        /// When the entry was cancelled.
        cancelled_at: DateTime<Utc>,
        /// The reason for the reversal.
        reason: String,
        /// The draft reversal entry that negates this one.
        reversal: JournalEntryId,
    },
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Sum of all debit lines.
    pub debit_total: Decimal,
    /// Sum of all credit lines.
    pub credit_total: Decimal,
    /// The entry currency.
    pub currency: Currency,
}

impl EntryTotals {
    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit_total == self.credit_total
    }
}

/// Result of reversing a posted entry: the new draft plus the audit
/// descriptor for the cancelled original.
#[derive(Debug)]
pub struct ReversalOutcome {
    /// The new draft entry with every line's debit/credit swapped.
    pub reversal: JournalEntry,
    /// The cancellation recorded against the original entry.
    pub change: EntryChange,
}

/// A journal entry: ordered lines plus lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    id: JournalEntryId,
    entry_number: String,
    original_document_number: String,
    entry_date: NaiveDate,
    original_document_date: NaiveDate,
    description: String,
    currency: Currency,
    status: EntryStatus,
    lines: Vec<JournalLine>,
    invoice_reference: Option<InvoiceId>,
    posted_by: Option<UserId>,
    posted_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    reversal_of: Option<JournalEntryId>,
}

impl JournalEntry {
    /// Maximum number of lines per entry.
    pub const MAX_LINES: usize = 99;

    /// Creates a new draft entry.
    ///
    /// `today` is the injected current date used for the non-future
    /// check; production callers pass the clock reading, tests pass a
    /// fixed date.
    ///
    /// # Errors
    ///
    /// Returns a Validation-kind error when the description or document
    /// number is blank, the document date is after `today` or after the
    /// entry date, or the document date is more than one year before the
    /// entry date.
    pub fn create(input: CreateEntryInput, today: NaiveDate) -> Result<Self, JournalError> {
        if input.description.trim().is_empty() {
            return Err(JournalError::BlankDescription);
        }
        if input.original_document_number.trim().is_empty() {
            return Err(JournalError::BlankDocumentNumber);
        }
        if input.original_document_date > today {
            return Err(JournalError::FutureDocumentDate {
                document_date: input.original_document_date,
                today,
            });
        }
        if input.original_document_date > input.entry_date {
            return Err(JournalError::DocumentDateAfterEntryDate {
                document_date: input.original_document_date,
                entry_date: input.entry_date,
            });
        }
        let oldest_allowed = input
            .entry_date
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);
        if input.original_document_date < oldest_allowed {
            return Err(JournalError::DocumentDateTooOld {
                document_date: input.original_document_date,
                entry_date: input.entry_date,
            });
        }

        let id = JournalEntryId::new();
        let entry_number = Self::generate_entry_number(id, input.entry_date);
        Ok(Self {
            id,
            entry_number,
            original_document_number: input.original_document_number,
            entry_date: input.entry_date,
            original_document_date: input.original_document_date,
            description: input.description,
            currency: input.currency,
            status: EntryStatus::Draft,
            lines: Vec::new(),
            invoice_reference: None,
            posted_by: None,
            posted_at: None,
            cancelled_at: None,
            reversal_of: None,
        })
    }

    /// Adds a line to a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless the entry is Draft, `TooManyLines`
    /// past the 99-line limit, and `LineCurrencyMismatch` when the line
    /// currency differs from the entry currency.
    pub fn add_line(&mut self, line: JournalLine) -> Result<EntryChange, JournalError> {
        if !self.status.is_editable() {
            return Err(JournalError::NotEditable {
                status: self.status,
            });
        }
        if self.lines.len() >= Self::MAX_LINES {
            return Err(JournalError::TooManyLines {
                max: Self::MAX_LINES,
            });
        }
        if line.currency() != self.currency {
            return Err(JournalError::LineCurrencyMismatch {
                entry: self.currency,
                line: line.currency(),
            });
        }

        let change = EntryChange::LineAdded {
            account: line.account().clone(),
            side: line.side(),
            amount: line.amount(),
        };
        self.lines.push(line);
        Ok(change)
    }

    /// Links the entry to its source invoice. Draft only, at most once.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless the entry is Draft and
    /// `InvoiceAlreadyLinked` if a link is already present.
    pub fn link_to_invoice(&mut self, invoice: InvoiceId) -> Result<EntryChange, JournalError> {
        if !self.status.is_editable() {
            return Err(JournalError::NotEditable {
                status: self.status,
            });
        }
        if self.invoice_reference.is_some() {
            return Err(JournalError::InvoiceAlreadyLinked);
        }

        self.invoice_reference = Some(invoice);
        Ok(EntryChange::InvoiceLinked { invoice })
    }

    /// Posts the entry: the one-way Draft → Posted transition.
    ///
    /// All checks complete before any field changes, so a failed post
    /// leaves the entry exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPosted`/`NotDraft` from the wrong state, `NoLines`
    /// for an empty entry, `Unbalanced` when debit and credit totals
    /// differ, and `RevenueWithoutInvoice` when a revenue-classified line
    /// is present without an invoice link.
    pub fn post(
        &mut self,
        posted_by: UserId,
        posted_at: DateTime<Utc>,
    ) -> Result<EntryChange, JournalError> {
        match self.status {
            EntryStatus::Draft => {}
            EntryStatus::Posted => return Err(JournalError::AlreadyPosted),
            EntryStatus::Cancelled => {
                return Err(JournalError::NotDraft {
                    status: self.status,
                });
            }
        }
        if self.lines.is_empty() {
            return Err(JournalError::NoLines);
        }

        let totals = self.totals();
        if !totals.is_balanced() {
            return Err(JournalError::Unbalanced {
                debits: totals.debit_total,
                credits: totals.credit_total,
            });
        }

        if self.invoice_reference.is_none() {
            if let Some(line) = self.lines.iter().find(|l| l.account().class().is_revenue()) {
                return Err(JournalError::RevenueWithoutInvoice {
                    account: line.account().clone(),
                });
            }
        }

        self.status = EntryStatus::Posted;
        self.posted_by = Some(posted_by);
        self.posted_at = Some(posted_at);
        Ok(EntryChange::Posted {
            posted_by,
            posted_at,
        })
    }

    /// Reverses a posted entry.
    ///
    /// Produces a new Draft entry whose lines are the originals with
    /// debit and credit swapped (same accounts, amounts, and order),
    /// pointing back at this entry; this entry becomes Cancelled. The
    /// reversal takes ledger effect only through its own `post` call.
    ///
    /// # Errors
    ///
    /// Returns `NotPosted` unless the entry is Posted and
    /// `ReversalReasonRequired` for a blank reason.
    pub fn create_reversal(
        &mut self,
        new_number: impl Into<String>,
        reason: impl Into<String>,
        cancelled_by: UserId,
        cancelled_at: DateTime<Utc>,
    ) -> Result<ReversalOutcome, JournalError> {
        if self.status != EntryStatus::Posted {
            return Err(JournalError::NotPosted {
                status: self.status,
            });
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(JournalError::ReversalReasonRequired);
        }

        let reversal = Self {
            id: JournalEntryId::new(),
            entry_number: new_number.into(),
            original_document_number: self.original_document_number.clone(),
            entry_date: self.entry_date,
            original_document_date: self.original_document_date,
            description: self.description.clone(),
            currency: self.currency,
            status: EntryStatus::Draft,
            lines: self.lines.iter().map(JournalLine::swapped).collect(),
            // Carried over so a revenue reversal can itself be posted.
            invoice_reference: self.invoice_reference,
            posted_by: None,
            posted_at: None,
            cancelled_at: None,
            reversal_of: Some(self.id),
        };

        self.status = EntryStatus::Cancelled;
        self.cancelled_at = Some(cancelled_at);

        let change = EntryChange::Cancelled {
            cancelled_by,
            cancelled_at,
            reason,
            reversal: reversal.id,
        };
        Ok(ReversalOutcome { reversal, change })
    }

    /// Returns the debit and credit totals of the entry.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        let debit_total: Decimal = self.lines.iter().map(|l| l.debit_amount().amount()).sum();
        let credit_total: Decimal = self.lines.iter().map(|l| l.credit_amount().amount()).sum();
        EntryTotals {
            debit_total,
            credit_total,
            currency: self.currency,
        }
    }

    /// Returns true if the entry is currently posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == EntryStatus::Posted
    }

    /// Returns true if the entry was posted at some point.
    ///
    /// A cancelled entry took ledger effect before its reversal, so it
    /// does not count as unposted when a period closes; only Draft
    /// entries block closing.
    #[must_use]
    pub fn has_taken_effect(&self) -> bool {
        self.status.is_immutable()
    }

    /// Returns the entry ID.
    #[must_use]
    pub const fn id(&self) -> JournalEntryId {
        self.id
    }

    /// Returns the generated entry number.
    #[must_use]
    pub fn entry_number(&self) -> &str {
        &self.entry_number
    }

    /// Returns the source document number.
    #[must_use]
    pub fn original_document_number(&self) -> &str {
        &self.original_document_number
    }

    /// Returns the business date the entry books under.
    #[must_use]
    pub const fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    /// Returns the date on the source document.
    #[must_use]
    pub const fn original_document_date(&self) -> NaiveDate {
        self.original_document_date
    }

    /// Returns the entry description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the entry currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> EntryStatus {
        self.status
    }

    /// Returns the entry lines in booking order.
    #[must_use]
    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    /// Returns the linked invoice, if any.
    #[must_use]
    pub const fn invoice_reference(&self) -> Option<InvoiceId> {
        self.invoice_reference
    }

    /// Returns who posted the entry, if posted.
    #[must_use]
    pub const fn posted_by(&self) -> Option<UserId> {
        self.posted_by
    }

    /// Returns when the entry was posted, if posted.
    #[must_use]
    pub const fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }

    /// Returns when the entry was cancelled, if cancelled.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns the original entry this one reverses, if any.
    #[must_use]
    pub const fn reversal_of(&self) -> Option<JournalEntryId> {
        self.reversal_of
    }

    /// Entry numbers are `JE-{yyyymm}-{first 8 uuid hex chars}`.
    fn generate_entry_number(id: JournalEntryId, entry_date: NaiveDate) -> String {
        let uuid_hex = id.into_inner().simple().to_string();
        format!(
            "JE-{:04}{:02}-{}",
            entry_date.year(),
            entry_date.month(),
            &uuid_hex[..8]
        )
    }
}
