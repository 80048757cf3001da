//! Core domain library for PasteLite (config, expiry policy, storage, store).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer backed by redb.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Time and view-count expiry rules.
pub mod expiry;
/// Paste identifier generation.
pub mod id;
/// Data models for API requests and persistence.
pub mod models;
/// Paste lifecycle operations (create, read, sweep, stats).
pub mod store;

#[cfg(test)]
pub(crate) mod env;
#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_PORT, DEFAULT_REAP_INTERVAL_SECS};
pub use db::Database;
pub use error::AppError;
pub use store::PasteStore;
