//! Accounting period aggregate and its gated lifecycle.
//!
//! A period is one calendar month of the books. It opens accepting
//! postings, closes only after the closing preconditions hold (no
//! unposted entries in range, balanced trial balance, no disallowed
//! negative balances), may be reopened exactly once, and locks
//! irreversibly. Every mutating call returns a typed change descriptor
//! for the caller's audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use fiducia_shared::config::ClosingPolicy;
use fiducia_shared::types::{AccountingPeriodId, UserId};

use crate::journal::entry::JournalEntry;
use crate::period::error::PeriodError;
use crate::period::trial_balance::TrialBalance;

/// Accounting period status in the close lifecycle.
///
/// Valid transitions:
/// - Open → Closing → Closed (close; Closing is transient inside it)
/// - Closed → Open (reopen, at most once)
/// - Closed → Locked (lock, irreversible)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period accepts postings.
    Open,
    /// Close preconditions passed; closing entries are being produced.
    Closing,
    /// Period is closed; may be reopened once or locked.
    Closed,
    /// Period is locked for good.
    Locked,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Locked => "locked",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closing" => Some(Self::Closing),
            "closed" => Some(Self::Closed),
            "locked" => Some(Self::Locked),
            _ => None,
        }
    }

    /// Returns true if entries may post into the period.
    #[must_use]
    pub const fn allows_posting(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One manually recorded pre-closing check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// What was checked.
    pub description: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Free-form notes from the reviewer.
    pub notes: Option<String>,
    /// When the check was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Change descriptor returned by each mutating period operation.
#[derive(Debug, Clone)]
pub enum PeriodChange {
    /// The period was closed.
    Closed {
        /// The user who closed the period.
        closed_by: UserId,
        /// When the period was closed.
        closed_at: DateTime<Utc>,
    },
    /// The period was reopened.
    Reopened {
        /// The user who reopened the period.
        reopened_by: UserId,
        /// Why the period was reopened.
        reason: String,
    },
    /// The period was locked.
    Locked {
        /// The user who locked the period.
        locked_by: UserId,
        /// When the period was locked.
        locked_at: DateTime<Utc>,
    },
    /// A pre-closing checklist item was recorded.
    ChecklistItemAdded {
        /// What was checked.
        description: String,
        /// Whether the check passed.
        passed: bool,
    },
}

/// A month-scoped accounting period gating which entries may post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingPeriod {
    id: AccountingPeriodId,
    year: i32,
    month: u32,
    status: PeriodStatus,
    closed_at: Option<DateTime<Utc>>,
    closed_by: Option<UserId>,
    locked_at: Option<DateTime<Utc>>,
    locked_by: Option<UserId>,
    reopen_reason: Option<String>,
    reopen_count: u8,
    checklist: Vec<ChecklistItem>,
}

impl AccountingPeriod {
    /// Creates an open period for the given month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYear` outside 1000-9999 and `InvalidMonth`
    /// outside 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1000..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear { year });
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth { month });
        }
        Ok(Self {
            id: AccountingPeriodId::new(),
            year,
            month,
            status: PeriodStatus::Open,
            closed_at: None,
            closed_by: None,
            locked_at: None,
            locked_by: None,
            reopen_reason: None,
            reopen_count: 0,
            checklist: Vec::new(),
        })
    }

    /// Closes the period after validating every precondition.
    ///
    /// Preconditions, all checked before any field changes:
    /// 1. no draft entry dated inside the period,
    /// 2. the supplied trial balance balances exactly,
    /// 3. no account outside the policy's contra allowlist carries a
    ///    negative closing balance.
    ///
    /// On success the period passes through the transient Closing state
    /// and lands Closed. Period-end closing entries (depreciation,
    /// accruals) are produced by the calling layer, not here.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed`/`PeriodLocked` from the wrong state and a
    /// ComplianceViolation-kind error when a precondition fails.
    pub fn close(
        &mut self,
        closed_by: UserId,
        closed_at: DateTime<Utc>,
        entries: &[JournalEntry],
        trial_balance: &TrialBalance,
        policy: &ClosingPolicy,
    ) -> Result<PeriodChange, PeriodError> {
        match self.status {
            PeriodStatus::Open => {}
            PeriodStatus::Closing | PeriodStatus::Closed => {
                return Err(PeriodError::AlreadyClosed);
            }
            PeriodStatus::Locked => return Err(PeriodError::PeriodLocked),
        }

        let unposted = entries
            .iter()
            .filter(|e| self.contains_date(e.entry_date()) && !e.has_taken_effect())
            .count();
        if unposted > 0 {
            return Err(PeriodError::UnpostedEntries { count: unposted });
        }

        if !trial_balance.is_balanced() {
            return Err(PeriodError::TrialBalanceUnbalanced {
                debits: trial_balance.total_debit(),
                credits: trial_balance.total_credit(),
            });
        }

        for row in &trial_balance.rows {
            if policy.is_contra(&row.account) {
                continue;
            }
            let balance = row.closing_balance();
            if balance < Decimal::ZERO {
                return Err(PeriodError::NegativeBalance {
                    account: row.account.clone(),
                    balance,
                });
            }
        }

        // Closing is transient: the calling layer synthesizes period-end
        // closing entries against this state, then the period seals.
        self.status = PeriodStatus::Closing;
        self.status = PeriodStatus::Closed;
        self.closed_at = Some(closed_at);
        self.closed_by = Some(closed_by);
        Ok(PeriodChange::Closed {
            closed_by,
            closed_at,
        })
    }

    /// Reopens a closed period. Allowed exactly once, never from Locked.
    ///
    /// # Errors
    ///
    /// Returns `PeriodLocked` for a locked period, `NotClosed` unless
    /// Closed, `ReopenReasonRequired` for a blank reason, and
    /// `AlreadyReopened` on the second attempt.
    pub fn reopen(
        &mut self,
        reopened_by: UserId,
        reason: impl Into<String>,
    ) -> Result<PeriodChange, PeriodError> {
        if self.status == PeriodStatus::Locked {
            return Err(PeriodError::PeriodLocked);
        }
        if self.status != PeriodStatus::Closed {
            return Err(PeriodError::NotClosed {
                status: self.status,
            });
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(PeriodError::ReopenReasonRequired);
        }
        if self.reopen_count >= 1 {
            return Err(PeriodError::AlreadyReopened);
        }

        self.status = PeriodStatus::Open;
        self.reopen_count += 1;
        self.reopen_reason = Some(reason.clone());
        Ok(PeriodChange::Reopened {
            reopened_by,
            reason,
        })
    }

    /// Locks a closed period for good.
    ///
    /// # Errors
    ///
    /// Returns `NotClosed` unless the period is Closed.
    pub fn lock(
        &mut self,
        locked_by: UserId,
        locked_at: DateTime<Utc>,
    ) -> Result<PeriodChange, PeriodError> {
        if self.status != PeriodStatus::Closed {
            return Err(PeriodError::NotClosed {
                status: self.status,
            });
        }

        self.status = PeriodStatus::Locked;
        self.locked_at = Some(locked_at);
        self.locked_by = Some(locked_by);
        Ok(PeriodChange::Locked {
            locked_by,
            locked_at,
        })
    }

    /// Posting guard: fails unless the period is Open.
    ///
    /// # Errors
    ///
    /// Returns the distinguished `PeriodClosed` error carrying the
    /// current status.
    pub fn ensure_open(&self) -> Result<(), PeriodError> {
        if self.status.allows_posting() {
            Ok(())
        } else {
            Err(PeriodError::PeriodClosed {
                status: self.status,
            })
        }
    }

    /// Records a manual pre-closing check. Append-only; does not affect
    /// the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `BlankChecklistDescription` for a blank description.
    pub fn add_checklist_item(
        &mut self,
        description: impl Into<String>,
        passed: bool,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<PeriodChange, PeriodError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(PeriodError::BlankChecklistDescription);
        }

        self.checklist.push(ChecklistItem {
            description: description.clone(),
            passed,
            notes,
            recorded_at,
        });
        Ok(PeriodChange::ChecklistItemAdded {
            description,
            passed,
        })
    }

    /// Returns the first day of the period.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        // Year and month are validated at construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the last day of the period.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns the calendar quarter (1-4) the period falls in.
    #[must_use]
    pub const fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    /// Returns true if the date falls inside the period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }

    /// Returns the period ID.
    #[must_use]
    pub const fn id(&self) -> AccountingPeriodId {
        self.id
    }

    /// Returns the period year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the period month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PeriodStatus {
        self.status
    }

    /// Returns when the period was closed, if closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns who closed the period, if closed.
    #[must_use]
    pub const fn closed_by(&self) -> Option<UserId> {
        self.closed_by
    }

    /// Returns when the period was locked, if locked.
    #[must_use]
    pub const fn locked_at(&self) -> Option<DateTime<Utc>> {
        self.locked_at
    }

    /// Returns who locked the period, if locked.
    #[must_use]
    pub const fn locked_by(&self) -> Option<UserId> {
        self.locked_by
    }

    /// Returns the recorded reopen reason, if reopened.
    #[must_use]
    pub fn reopen_reason(&self) -> Option<&str> {
        self.reopen_reason.as_deref()
    }

    /// Returns how many times the period has been reopened (0 or 1).
    #[must_use]
    pub const fn reopen_count(&self) -> u8 {
        self.reopen_count
    }

    /// Returns the recorded pre-closing checks in order.
    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }
}

impl fmt::Display for AccountingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
