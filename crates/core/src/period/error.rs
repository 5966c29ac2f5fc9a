//! Period error types for lifecycle and closing-precondition failures.

use rust_decimal::Decimal;
use thiserror::Error;

use fiducia_shared::types::AccountCode;
use fiducia_shared::ErrorKind;

use crate::period::period::PeriodStatus;

/// Errors that can occur during accounting period operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    // ========== Validation Errors ==========
    /// Month must be between 1 and 12.
    #[error("Month must be between 1 and 12, got {month}")]
    InvalidMonth {
        /// The rejected month value.
        month: u32,
    },

    /// Year is outside the supported range.
    #[error("Year must be between 1000 and 9999, got {year}")]
    InvalidYear {
        /// The rejected year value.
        year: i32,
    },

    /// A reopen requires a non-blank reason.
    #[error("Reopen reason cannot be blank")]
    ReopenReasonRequired,

    /// A checklist item requires a non-blank description.
    #[error("Checklist item description cannot be blank")]
    BlankChecklistDescription,

    // ========== State Errors ==========
    /// The period is already closed.
    #[error("Period is already closed")]
    AlreadyClosed,

    /// The period is locked; no further transitions are possible.
    #[error("Period is locked")]
    PeriodLocked,

    /// The operation requires a closed period.
    #[error("Period must be closed first (status: {status})")]
    NotClosed {
        /// The current status of the period.
        status: PeriodStatus,
    },

    /// The period has already been reopened once.
    #[error("Period has already been reopened once")]
    AlreadyReopened,

    /// Posting guard: the period does not accept postings.
    #[error("Period is not open for posting (status: {status})")]
    PeriodClosed {
        /// The current status of the period.
        status: PeriodStatus,
    },

    // ========== Compliance Errors ==========
    /// Unposted entries remain inside the period's date range.
    #[error("Cannot close period: {count} unposted entries in range")]
    UnpostedEntries {
        /// How many draft entries fall inside the period.
        count: usize,
    },

    /// The supplied trial balance does not balance.
    #[error("Trial balance is not balanced. Debit: {debits}, Credit: {credits}")]
    TrialBalanceUnbalanced {
        /// Total debit across all rows.
        debits: Decimal,
        /// Total credit across all rows.
        credits: Decimal,
    },

    /// A non-contra account carries a negative closing balance.
    #[error("Account {account} has a negative closing balance: {balance}")]
    NegativeBalance {
        /// The offending account.
        account: AccountCode,
        /// Its signed closing balance.
        balance: Decimal,
    },
}

impl PeriodError {
    /// Returns the taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMonth { .. }
            | Self::InvalidYear { .. }
            | Self::ReopenReasonRequired
            | Self::BlankChecklistDescription => ErrorKind::Validation,

            Self::AlreadyClosed
            | Self::PeriodLocked
            | Self::NotClosed { .. }
            | Self::AlreadyReopened
            | Self::PeriodClosed { .. } => ErrorKind::StateTransition,

            Self::UnpostedEntries { .. }
            | Self::TrialBalanceUnbalanced { .. }
            | Self::NegativeBalance { .. } => ErrorKind::ComplianceViolation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMonth { .. } => "INVALID_MONTH",
            Self::InvalidYear { .. } => "INVALID_YEAR",
            Self::ReopenReasonRequired => "REOPEN_REASON_REQUIRED",
            Self::BlankChecklistDescription => "BLANK_CHECKLIST_DESCRIPTION",
            Self::AlreadyClosed => "ALREADY_CLOSED",
            Self::PeriodLocked => "PERIOD_LOCKED",
            Self::NotClosed { .. } => "NOT_CLOSED",
            Self::AlreadyReopened => "ALREADY_REOPENED",
            Self::PeriodClosed { .. } => "PERIOD_CLOSED",
            Self::UnpostedEntries { .. } => "UNPOSTED_ENTRIES",
            Self::TrialBalanceUnbalanced { .. } => "TRIAL_BALANCE_UNBALANCED",
            Self::NegativeBalance { .. } => "NEGATIVE_BALANCE",
        }
    }
}
