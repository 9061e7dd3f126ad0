//! # JSON Storage Module
//!
//! Account history kept in a single JSON document:
//!
//! ```json
//! {
//!   "accounts": [
//!     {
//!       "name": "test",
//!       "transactions": [
//!         { "created_at": "2024-05-01T10:00:00Z", "type": "income", "count": 1500.0 }
//!       ]
//!     }
//!   ]
//! }
//! ```

pub mod history_repository;

pub use history_repository::{AccountHistory, HistoryFile, JsonHistoryRepository};
