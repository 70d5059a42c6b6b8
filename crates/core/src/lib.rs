//! Core types and shared functionality for crawlback.
//!
//! This crate provides:
//! - The snapshot catalog of published crawls and month resolution
//! - Match override tables
//! - Unified error types
//! - Configuration structures

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{CatalogEntry, MatchTable, MonthKey, MonthResolver, SnapshotCatalog};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
