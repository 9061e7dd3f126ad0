//! # Storage Module
//!
//! Sources of account history. The domain layer only sees the
//! [`HistoryStorage`] trait; the JSON file implementation backs the CLI and
//! the tests.

pub mod json;
pub mod traits;

pub use json::JsonHistoryRepository;
pub use traits::{HistoryError, HistoryStorage, SessionContext};
