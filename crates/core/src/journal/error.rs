//! Journal error types for validation, invariant, state, and compliance
//! failures.
//!
//! Every variant carries the offending field or amount so the calling
//! layer can build a precise message without re-deriving context.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use fiducia_shared::types::{AccountCode, AccountCodeError, Currency, MoneyError};
use fiducia_shared::ErrorKind;

use crate::journal::entry::EntryStatus;

/// Errors that can occur during journal entry operations.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Description cannot be blank.
    #[error("Description cannot be blank")]
    BlankDescription,

    /// Original document number cannot be blank.
    #[error("Original document number cannot be blank")]
    BlankDocumentNumber,

    /// Original document date is in the future.
    #[error("Original document date {document_date} is after today ({today})")]
    FutureDocumentDate {
        /// The offending document date.
        document_date: NaiveDate,
        /// The injected current date.
        today: NaiveDate,
    },

    /// Original document date is after the entry date.
    #[error("Original document date {document_date} is after entry date {entry_date}")]
    DocumentDateAfterEntryDate {
        /// The offending document date.
        document_date: NaiveDate,
        /// The entry date.
        entry_date: NaiveDate,
    },

    /// Original document date is more than one year before the entry date.
    #[error(
        "Original document date {document_date} is more than one year before entry date {entry_date}"
    )]
    DocumentDateTooOld {
        /// The offending document date.
        document_date: NaiveDate,
        /// The entry date.
        entry_date: NaiveDate,
    },

    /// A reversal requires a non-blank reason.
    #[error("Reversal reason cannot be blank")]
    ReversalReasonRequired,

    /// Line currency does not match the entry currency.
    #[error("Line currency {line} does not match entry currency {entry}")]
    LineCurrencyMismatch {
        /// Currency of the entry.
        entry: Currency,
        /// Currency of the rejected line.
        line: Currency,
    },

    // ========== Invariant Errors ==========
    /// Line amount must be strictly positive.
    #[error("Line amount must be positive")]
    NonPositiveAmount,

    /// A line must book on one side only.
    #[error("A line cannot carry both a debit and a credit amount")]
    BothSidesPositive,

    /// Journal entry line limit exceeded.
    #[error("Journal entry cannot exceed {max} lines")]
    TooManyLines {
        /// The maximum number of lines per entry.
        max: usize,
    },

    /// Journal entry must have at least one line.
    #[error("Journal entry must have at least one line")]
    NoLines,

    /// Debit and credit totals differ.
    #[error("Journal entry is not balanced. Debit: {debits}, Credit: {credits}")]
    Unbalanced {
        /// Total of all debit lines.
        debits: Decimal,
        /// Total of all credit lines.
        credits: Decimal,
    },

    // ========== State Errors ==========
    /// Only draft entries can be modified.
    #[error("Cannot modify a {status} entry")]
    NotEditable {
        /// The current status of the entry.
        status: EntryStatus,
    },

    /// The entry has already been posted.
    #[error("Entry has already been posted")]
    AlreadyPosted,

    /// Only draft entries can be posted.
    #[error("Only draft entries can be posted (status: {status})")]
    NotDraft {
        /// The current status of the entry.
        status: EntryStatus,
    },

    /// The entry is already linked to an invoice.
    #[error("Entry is already linked to an invoice")]
    InvoiceAlreadyLinked,

    /// Only posted entries can be reversed.
    #[error("Only posted entries can be reversed (status: {status})")]
    NotPosted {
        /// The current status of the entry.
        status: EntryStatus,
    },

    // ========== Compliance Errors ==========
    /// Revenue postings require a linked invoice.
    #[error("Revenue account {account} requires a linked invoice before posting")]
    RevenueWithoutInvoice {
        /// The revenue-classified account missing an invoice link.
        account: AccountCode,
    },

    // ========== Value Type Errors ==========
    /// Monetary amount construction or arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Account code validation failed.
    #[error(transparent)]
    Account(#[from] AccountCodeError),
}

impl JournalError {
    /// Returns the taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BlankDescription
            | Self::BlankDocumentNumber
            | Self::FutureDocumentDate { .. }
            | Self::DocumentDateAfterEntryDate { .. }
            | Self::DocumentDateTooOld { .. }
            | Self::ReversalReasonRequired
            | Self::LineCurrencyMismatch { .. } => ErrorKind::Validation,

            Self::NonPositiveAmount
            | Self::BothSidesPositive
            | Self::TooManyLines { .. }
            | Self::NoLines
            | Self::Unbalanced { .. } => ErrorKind::InvariantViolation,

            Self::NotEditable { .. }
            | Self::AlreadyPosted
            | Self::NotDraft { .. }
            | Self::InvoiceAlreadyLinked
            | Self::NotPosted { .. } => ErrorKind::StateTransition,

            Self::RevenueWithoutInvoice { .. } => ErrorKind::ComplianceViolation,

            Self::Money(e) => e.kind(),
            Self::Account(e) => e.kind(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BlankDescription => "BLANK_DESCRIPTION",
            Self::BlankDocumentNumber => "BLANK_DOCUMENT_NUMBER",
            Self::FutureDocumentDate { .. } => "FUTURE_DOCUMENT_DATE",
            Self::DocumentDateAfterEntryDate { .. } => "DOCUMENT_DATE_AFTER_ENTRY_DATE",
            Self::DocumentDateTooOld { .. } => "DOCUMENT_DATE_TOO_OLD",
            Self::ReversalReasonRequired => "REVERSAL_REASON_REQUIRED",
            Self::LineCurrencyMismatch { .. } => "LINE_CURRENCY_MISMATCH",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::BothSidesPositive => "BOTH_SIDES_POSITIVE",
            Self::TooManyLines { .. } => "TOO_MANY_LINES",
            Self::NoLines => "NO_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::NotEditable { .. } => "NOT_EDITABLE",
            Self::AlreadyPosted => "ALREADY_POSTED",
            Self::NotDraft { .. } => "NOT_DRAFT",
            Self::InvoiceAlreadyLinked => "INVOICE_ALREADY_LINKED",
            Self::NotPosted { .. } => "NOT_POSTED",
            Self::RevenueWithoutInvoice { .. } => "REVENUE_WITHOUT_INVOICE",
            Self::Money(_) => "MONEY_ERROR",
            Self::Account(_) => "ACCOUNT_CODE_ERROR",
        }
    }
}
