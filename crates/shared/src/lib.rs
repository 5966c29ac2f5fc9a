//! Shared types, errors, and configuration for Fiducia.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Validated chart-of-accounts codes and their classification
//! - Typed IDs for type-safe entity references
//! - The application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ClosingPolicy};
pub use error::ErrorKind;
