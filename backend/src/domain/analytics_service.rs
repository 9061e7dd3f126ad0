//! # Analytics Service
//!
//! Wires the history source to the chart pipeline:
//! fetch -> map DTOs -> aggregate -> geometry.
//!
//! A failed fetch is never an analytics error. Whatever the storage reports
//! is logged and the pipeline continues with an empty transaction list, so
//! the page shows its "no data" placeholder.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{AnalyticsPeriod, ChartData, ChartGeometry, HistoryRequest};
use tracing::{info, warn};

use crate::domain::aggregation_service::{AggregationService, ChartSeries, Granularity};
use crate::domain::analytics_state::period_range;
use crate::domain::chart_geometry::ChartGeometryService;
use crate::domain::date_range_picker::DateRange;
use crate::domain::date_utils::format_iso_date;
use crate::domain::models::transaction::Transaction;
use crate::storage::{HistoryStorage, SessionContext};

/// What to chart
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsQuery {
    pub account_name: String,
    pub period: AnalyticsPeriod,
    /// Inclusive range; `None` fetches the whole history
    pub range: Option<DateRange>,
}

impl AnalyticsQuery {
    /// Query for a period as of `today`, using `committed` for custom periods
    pub fn for_period(
        account_name: impl Into<String>,
        period: AnalyticsPeriod,
        today: NaiveDate,
        committed: Option<DateRange>,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            period,
            range: period_range(period, today, committed),
        }
    }

    pub fn granularity(&self) -> Granularity {
        Granularity::from(self.period)
    }

    pub fn to_history_request(&self) -> HistoryRequest {
        HistoryRequest {
            name: self.account_name.clone(),
            from_date: self.range.map(|r| format_iso_date(r.start)),
            to_date: self.range.map(|r| format_iso_date(r.end)),
            transaction_type: None,
        }
    }
}

/// Everything the render surface needs for one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub chart: ChartData,
    pub geometry: ChartGeometry,
}

#[derive(Clone)]
pub struct AnalyticsService<S: HistoryStorage> {
    storage: Arc<S>,
    aggregation_service: AggregationService,
    geometry_service: ChartGeometryService,
}

impl<S: HistoryStorage> AnalyticsService<S> {
    pub fn new(storage: Arc<S>, geometry_service: ChartGeometryService) -> Self {
        Self {
            storage,
            aggregation_service: AggregationService::new(),
            geometry_service,
        }
    }

    /// Transactions for the query; any storage failure yields an empty list
    pub fn fetch_transactions(
        &self,
        ctx: &SessionContext,
        query: &AnalyticsQuery,
    ) -> Vec<Transaction> {
        let request = query.to_history_request();
        match self.storage.fetch_history(ctx, &request) {
            Ok(response) => response.transaction.iter().map(Transaction::from).collect(),
            Err(e) => {
                warn!(
                    "📊 ANALYTICS: history fetch for '{}' failed, charting no data: {}",
                    query.account_name, e
                );
                Vec::new()
            }
        }
    }

    pub fn load_series(&self, ctx: &SessionContext, query: &AnalyticsQuery) -> ChartSeries {
        let transactions = self.fetch_transactions(ctx, query);
        self.aggregation_service.aggregate(&transactions, query.granularity())
    }

    pub fn load_chart_data(&self, ctx: &SessionContext, query: &AnalyticsQuery) -> ChartData {
        self.load_series(ctx, query).into()
    }

    /// Chart data and geometry for one query
    pub fn load_chart(&self, ctx: &SessionContext, query: &AnalyticsQuery) -> AnalyticsSnapshot {
        let series = self.load_series(ctx, query);
        let geometry = self.geometry_service.build_geometry(&series);

        info!(
            "📊 ANALYTICS: {} {} -> {} points (income {:.2}, expenses {:.2})",
            query.account_name,
            query.period,
            series.point_count(),
            series.total_income,
            series.total_expense
        );

        AnalyticsSnapshot {
            chart: series.into(),
            geometry,
        }
    }
}
