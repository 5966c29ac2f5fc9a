//! Trial balance snapshot supplied to period close.
//!
//! The snapshot is an external input: an ordered list of per-account
//! debit/credit totals computed by the caller from posted entries. The
//! core only reads it, never mutates it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fiducia_shared::types::{AccountCode, Currency, Money, NormalSide};

/// Accumulated debit/credit totals for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account: AccountCode,
    /// Total debits booked against the account.
    pub debit: Money,
    /// Total credits booked against the account.
    pub credit: Money,
}

impl TrialBalanceRow {
    /// Returns the signed closing balance per the account's normal side.
    ///
    /// Debit-normal accounts: debit − credit. Credit-normal accounts:
    /// credit − debit. A negative result means the account sits on the
    /// wrong side of its class.
    #[must_use]
    pub fn closing_balance(&self) -> Decimal {
        match self.account.class().normal_side() {
            NormalSide::Debit => self.debit.amount() - self.credit.amount(),
            NormalSide::Credit => self.credit.amount() - self.debit.amount(),
        }
    }
}

/// Per-account totals for a period, used to confirm the books balance
/// before closing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Per-account rows in chart order.
    pub rows: Vec<TrialBalanceRow>,
    /// Currency all rows are stated in.
    pub currency: Currency,
}

impl TrialBalance {
    /// Creates an empty trial balance (zero totals, trivially balanced).
    #[must_use]
    pub const fn new(currency: Currency) -> Self {
        Self {
            rows: Vec::new(),
            currency,
        }
    }

    /// Creates a trial balance from prepared rows.
    #[must_use]
    pub fn with_rows(rows: Vec<TrialBalanceRow>, currency: Currency) -> Self {
        Self { rows, currency }
    }

    /// Returns the total debit across all rows.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.rows.iter().map(|r| r.debit.amount()).sum()
    }

    /// Returns the total credit across all rows.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.rows.iter().map(|r| r.credit.amount()).sum()
    }

    /// Returns true if total debit equals total credit exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }
}
