//! Chart-of-accounts codes and their classification.
//!
//! Account codes follow the standard numbered chart: the leading digit
//! determines the account class (1xx/2xx assets, 3xx liabilities, 4xx
//! equity, 5xx/7xx revenue, 6xx/8xx expenses, 9xx closing). Code `911`
//! is the income-summary account used only by period-end profit/loss
//! transfer and can never be constructed for ordinary posting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing an account code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCodeError {
    /// The code is not 3 to 5 ASCII digits.
    #[error("Invalid account code '{0}': must be 3-5 digits")]
    InvalidFormat(String),

    /// The code is reserved for period-end closing entries.
    #[error("Account code '{0}' is reserved for period-end closing")]
    ReservedCode(String),
}

impl AccountCodeError {
    /// Returns the taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> crate::error::ErrorKind {
        match self {
            Self::InvalidFormat(_) => crate::error::ErrorKind::Validation,
            Self::ReservedCode(_) => crate::error::ErrorKind::InvariantViolation,
        }
    }
}

/// A validated chart-of-accounts code.
///
/// Always 3 to 5 digits and never the reserved closing code, so any
/// `AccountCode` held by a journal line is safe to post against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountCode(String);

impl AccountCode {
    /// The income-summary code reserved for period-end closing entries.
    pub const RESERVED_CLOSING: &'static str = "911";

    /// Creates a validated account code.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeError::InvalidFormat` if the code is not 3-5
    /// ASCII digits, or `AccountCodeError::ReservedCode` for `911`.
    pub fn new(code: impl Into<String>) -> Result<Self, AccountCodeError> {
        let code = code.into();
        if code.len() < 3 || code.len() > 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountCodeError::InvalidFormat(code));
        }
        if code == Self::RESERVED_CLOSING {
            return Err(AccountCodeError::ReservedCode(code));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies the account by its leading digit.
    #[must_use]
    pub fn class(&self) -> AccountClass {
        // new() guarantees at least 3 ASCII digits.
        match self.0.as_bytes()[0] {
            b'1' | b'2' => AccountClass::Asset,
            b'3' => AccountClass::Liability,
            b'4' => AccountClass::Equity,
            b'5' | b'7' => AccountClass::Revenue,
            b'6' | b'8' => AccountClass::Expense,
            _ => AccountClass::Closing,
        }
    }
}

impl TryFrom<String> for AccountCode {
    type Error = AccountCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountCode> for String {
    fn from(code: AccountCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountCode {
    type Err = AccountCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Account classes derived from the leading code digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Cash, receivables, inventory, fixed assets (1xx, 2xx).
    Asset,
    /// Payables, loans, accrued obligations (3xx).
    Liability,
    /// Capital, retained earnings (4xx).
    Equity,
    /// Operating and other income (5xx, 7xx).
    Revenue,
    /// Operating and other costs (6xx, 8xx).
    Expense,
    /// Period-end closing accounts (9xx).
    Closing,
}

/// Which side of the books an account normally carries its balance on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalSide {
    /// Balance grows with debits (Asset, Expense).
    Debit,
    /// Balance grows with credits (Liability, Equity, Revenue, Closing).
    Credit,
}

impl AccountClass {
    /// Returns true for revenue accounts, which require an invoice link
    /// on any posting.
    #[must_use]
    pub const fn is_revenue(self) -> bool {
        matches!(self, Self::Revenue)
    }

    /// Returns the side the balance normally sits on.
    ///
    /// Asset/Expense: balance = debit - credit (debit-normal).
    /// Liability/Equity/Revenue/Closing: balance = credit - debit
    /// (credit-normal).
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue | Self::Closing => NormalSide::Credit,
        }
    }
}

impl std::fmt::Display for AccountClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset => write!(f, "asset"),
            Self::Liability => write!(f, "liability"),
            Self::Equity => write!(f, "equity"),
            Self::Revenue => write!(f, "revenue"),
            Self::Expense => write!(f, "expense"),
            Self::Closing => write!(f, "closing"),
        }
    }
}
