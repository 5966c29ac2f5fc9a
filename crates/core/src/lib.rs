//! Core accounting logic for Fiducia.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `journal` - Journal entry state machine and double-entry validation
//! - `period` - Accounting period lifecycle and closing preconditions
//! - `ledger` - Append-only hash-chained audit ledger and verification

pub mod journal;
pub mod ledger;
pub mod period;
