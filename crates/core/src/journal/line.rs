//! Journal entry lines.
//!
//! A line books a positive amount on exactly one side of exactly one
//! account. The opposite side is exactly zero, never merely small, so
//! the double-entry totals can be compared without tolerance.

use serde::{Deserialize, Serialize};

use fiducia_shared::types::{AccountCode, Currency, Money, MoneyError};

use crate::journal::error::JournalError;

/// The side of the books a line amount lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left side: assets and expenses grow here.
    Debit,
    /// Right side: liabilities, equity, and revenue grow here.
    Credit,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

/// One debit-or-credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawJournalLine")]
pub struct JournalLine {
    account: AccountCode,
    debit: Money,
    credit: Money,
    description: String,
}

/// Unvalidated mirror of [`JournalLine`]; deserialization lands here first
/// and must re-establish the one-side invariant.
#[derive(Deserialize)]
struct RawJournalLine {
    account: AccountCode,
    debit: Money,
    credit: Money,
    description: String,
}

impl TryFrom<RawJournalLine> for JournalLine {
    type Error = JournalError;

    fn try_from(raw: RawJournalLine) -> Result<Self, Self::Error> {
        if raw.debit.currency() != raw.credit.currency() {
            return Err(MoneyError::CurrencyMismatch {
                left: raw.debit.currency(),
                right: raw.credit.currency(),
            }
            .into());
        }
        let (amount, side) = match (raw.debit.is_positive(), raw.credit.is_positive()) {
            (true, false) => (raw.debit, Side::Debit),
            (false, true) => (raw.credit, Side::Credit),
            (true, true) => return Err(JournalError::BothSidesPositive),
            (false, false) => return Err(JournalError::NonPositiveAmount),
        };
        Self::build(raw.account, amount, raw.description, side)
    }
}

impl JournalLine {
    /// Creates a debit line.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` if the amount is zero or
    /// `BlankDescription` if the description is blank.
    pub fn debit(
        account: AccountCode,
        amount: Money,
        description: impl Into<String>,
    ) -> Result<Self, JournalError> {
        Self::build(account, amount, description.into(), Side::Debit)
    }

    /// Creates a credit line.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`JournalLine::debit`].
    pub fn credit(
        account: AccountCode,
        amount: Money,
        description: impl Into<String>,
    ) -> Result<Self, JournalError> {
        Self::build(account, amount, description.into(), Side::Credit)
    }

    fn build(
        account: AccountCode,
        amount: Money,
        description: String,
        side: Side,
    ) -> Result<Self, JournalError> {
        if !amount.is_positive() {
            return Err(JournalError::NonPositiveAmount);
        }
        if description.trim().is_empty() {
            return Err(JournalError::BlankDescription);
        }

        let zero = Money::zero(amount.currency());
        let (debit, credit) = match side {
            Side::Debit => (amount, zero),
            Side::Credit => (zero, amount),
        };
        Ok(Self {
            account,
            debit,
            credit,
            description,
        })
    }

    /// Returns a copy of this line with debit and credit swapped.
    ///
    /// Used by reversal creation: account, amount, and description are
    /// preserved, only the side flips.
    #[must_use]
    pub(crate) fn swapped(&self) -> Self {
        Self {
            account: self.account.clone(),
            debit: self.credit,
            credit: self.debit,
            description: self.description.clone(),
        }
    }

    /// Returns the account this line posts to.
    #[must_use]
    pub const fn account(&self) -> &AccountCode {
        &self.account
    }

    /// Returns the debit amount (zero for credit lines).
    #[must_use]
    pub const fn debit_amount(&self) -> Money {
        self.debit
    }

    /// Returns the credit amount (zero for debit lines).
    #[must_use]
    pub const fn credit_amount(&self) -> Money {
        self.credit
    }

    /// Returns the line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns which side the positive amount is on.
    #[must_use]
    pub fn side(&self) -> Side {
        if self.debit.is_positive() {
            Side::Debit
        } else {
            Side::Credit
        }
    }

    /// Returns the positive amount of this line.
    #[must_use]
    pub fn amount(&self) -> Money {
        match self.side() {
            Side::Debit => self.debit,
            Side::Credit => self.credit,
        }
    }

    /// Returns the line currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.amount().currency()
    }
}
