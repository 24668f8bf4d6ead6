//! Shared types, errors, and configuration for the IFRS ledger engine.
//!
//! This crate provides common types used across all other crates:
//! - Validated ISO 4217 currency codes
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management (aging brackets, posting precision)

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{AppError, AppResult};
