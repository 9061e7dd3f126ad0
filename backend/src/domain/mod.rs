//! # Domain Module
//!
//! Business logic of the analytics page: classification, aggregation,
//! chart geometry, the date range picker and the page state that ties
//! them together. Everything here is synchronous and storage-agnostic.

pub mod aggregation_service;
pub mod analytics_service;
pub mod analytics_state;
pub mod chart_geometry;
pub mod date_range_picker;
pub mod date_utils;
pub mod models;
pub mod transaction_classifier;

pub use aggregation_service::{AggregationService, ChartSeries, Granularity, PeriodBucket};
pub use analytics_service::{AnalyticsQuery, AnalyticsService, AnalyticsSnapshot};
pub use analytics_state::{AnalyticsState, PeriodSelectionError, RequestTicket};
pub use chart_geometry::{ChartGeometryService, ChartViewport, GridConfig};
pub use date_range_picker::{DateRange, DateRangePicker, RangePickerHandler, RangeSelection};
