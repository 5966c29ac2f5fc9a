//! Common types used across the application.

pub mod account;
pub mod id;
pub mod money;

pub use account::{AccountClass, AccountCode, AccountCodeError, NormalSide};
pub use id::*;
pub use money::{Currency, Money, MoneyError};
