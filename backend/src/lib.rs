//! # Dashboard Backend
//!
//! Income/expense analytics for the business banking dashboard: turns an
//! account's transaction history into chart series and drawable geometry,
//! and drives the custom date range picker.

pub mod config;
pub mod domain;
pub mod logging;
pub mod storage;

pub use config::DashboardConfig;
pub use domain::{AnalyticsQuery, AnalyticsService, AnalyticsSnapshot};
pub use storage::{HistoryError, HistoryStorage, JsonHistoryRepository, SessionContext};
