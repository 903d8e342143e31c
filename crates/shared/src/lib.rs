//! Shared types, errors, and configuration for Ledgerwright.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe record references
//! - The collaborator error type returned by every record primitive
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
