//! Accounting period lifecycle: open, close, reopen once, lock.
//!
//! The [`AccountingPeriod`] aggregate gates posting by date and walks
//! the close lifecycle with its compliance preconditions. The
//! [`TrialBalance`] snapshot feeds the balance checks at close time.

pub mod error;
pub mod period;
pub mod trial_balance;

#[cfg(test)]
mod period_props;

pub use error::PeriodError;
pub use period::{AccountingPeriod, ChecklistItem, PeriodChange, PeriodStatus};
pub use trial_balance::{TrialBalance, TrialBalanceRow};
