//! Transaction aggregation for the income/expense chart.
//!
//! Turns a flat list of transactions into two parallel series (income and
//! expenses) bucketed by period, plus axis labels and grand totals.
//!
//! ## Granularity
//!
//! - **Daily**: one bucket per calendar day (`YYYY-MM-DD`), labelled `DD.MM`.
//!   Used for the month view and for custom ranges.
//! - **Monthly**: one bucket per month index (`"0"`..`"11"`), independent of
//!   the year, labelled with the short month name. Used for the year view.
//!
//! Buckets only exist for periods that contain at least one income or expense
//! record. Totals are accumulated from every qualifying record and therefore
//! never depend on the granularity.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::{AnalyticsPeriod, ChartData};
use tracing::debug;

use crate::domain::date_utils::format_iso_date;
use crate::domain::models::transaction::{Transaction, TransactionCategory};
use crate::domain::transaction_classifier::classify_transaction;

/// Short month names used as monthly bucket labels
pub const MONTH_LABELS: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

/// Time-bucketing resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// One bucket per calendar day
    Daily,
    /// One bucket per month of the year
    Monthly,
}

impl From<AnalyticsPeriod> for Granularity {
    fn from(period: AnalyticsPeriod) -> Self {
        match period {
            AnalyticsPeriod::Year => Granularity::Monthly,
            AnalyticsPeriod::Month | AnalyticsPeriod::Custom => Granularity::Daily,
        }
    }
}

/// Bucket identity. Ordering is chronological within one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum BucketKey {
    Day(NaiveDate),
    /// Zero-based month index
    Month(u32),
}

impl BucketKey {
    fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => BucketKey::Day(date),
            Granularity::Monthly => BucketKey::Month(date.month0()),
        }
    }

    fn key_string(&self) -> String {
        match self {
            BucketKey::Day(date) => format_iso_date(*date),
            BucketKey::Month(index) => index.to_string(),
        }
    }

    fn label(&self) -> String {
        match self {
            BucketKey::Day(date) => format!("{:02}.{:02}", date.day(), date.month()),
            BucketKey::Month(index) => MONTH_LABELS[*index as usize % 12].to_string(),
        }
    }
}

/// Income/expense accumulator for one period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBucket {
    /// `YYYY-MM-DD` for daily buckets, `"0"`..`"11"` for monthly buckets
    pub key: String,
    pub label: String,
    pub income_sum: f64,
    pub expense_sum: f64,
}

/// Aggregation result: parallel series sorted chronologically plus totals
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub total_income: f64,
    pub total_expense: f64,
    pub income_values: Vec<f64>,
    pub expense_values: Vec<f64>,
    pub labels: Vec<String>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.income_values.is_empty() && self.expense_values.is_empty()
    }

    /// Number of points along the x axis
    pub fn point_count(&self) -> usize {
        self.income_values
            .len()
            .max(self.expense_values.len())
            .max(self.labels.len())
    }
}

impl From<ChartSeries> for ChartData {
    fn from(series: ChartSeries) -> Self {
        ChartData {
            income: series.total_income,
            expenses: series.total_expense,
            income_data: series.income_values,
            expenses_data: series.expense_values,
            labels: series.labels,
        }
    }
}

/// Stateless aggregation service; every call is independent
#[derive(Debug, Clone, Default)]
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate transactions into ordered period buckets
    pub fn aggregate(&self, transactions: &[Transaction], granularity: Granularity) -> ChartSeries {
        let accumulated = self.accumulate(transactions, granularity);

        let mut series = ChartSeries {
            total_income: accumulated.total_income,
            total_expense: accumulated.total_expense,
            ..ChartSeries::default()
        };
        for bucket in accumulated.buckets.into_values() {
            series.income_values.push(bucket.income_sum);
            series.expense_values.push(bucket.expense_sum);
            series.labels.push(bucket.label);
        }

        debug!(
            "📊 AGGREGATE: {} transactions -> {} {:?} buckets (income {:.2}, expenses {:.2})",
            transactions.len(),
            series.labels.len(),
            granularity,
            series.total_income,
            series.total_expense
        );

        series
    }

    /// Sorted list of non-empty buckets
    pub fn build_buckets(
        &self,
        transactions: &[Transaction],
        granularity: Granularity,
    ) -> Vec<PeriodBucket> {
        self.accumulate(transactions, granularity)
            .buckets
            .into_values()
            .collect()
    }

    /// Single pass over the input. Records with unparseable timestamps or
    /// unrecognized kinds are skipped.
    fn accumulate(&self, transactions: &[Transaction], granularity: Granularity) -> Accumulated {
        let mut acc = Accumulated::default();
        let mut skipped = 0usize;

        for transaction in transactions {
            let Some(classified) = classify_transaction(transaction) else {
                skipped += 1;
                continue;
            };
            if classified.category == TransactionCategory::Ignored {
                continue;
            }

            let key = BucketKey::for_date(classified.timestamp.date(), granularity);
            let bucket = acc.buckets.entry(key).or_insert_with(|| PeriodBucket {
                key: key.key_string(),
                label: key.label(),
                income_sum: 0.0,
                expense_sum: 0.0,
            });

            match classified.category {
                TransactionCategory::Income => {
                    bucket.income_sum += classified.amount;
                    acc.total_income += classified.amount;
                }
                TransactionCategory::Expense => {
                    bucket.expense_sum += classified.amount;
                    acc.total_expense += classified.amount;
                }
                TransactionCategory::Ignored => {}
            }
        }

        if skipped > 0 {
            debug!("📊 AGGREGATE: skipped {} transactions with unparseable timestamps", skipped);
        }

        acc
    }
}

#[derive(Default)]
struct Accumulated {
    buckets: BTreeMap<BucketKey, PeriodBucket>,
    total_income: f64,
    total_expense: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(timestamp: &str, amount: f64, kind: &str) -> Transaction {
        Transaction::new(timestamp, amount, kind)
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            tx("2024-05-03T10:00:00Z", 100.0, "income"),
            tx("2024-05-01T09:00:00Z", 40.0, "outcome"),
            tx("2024-05-03T18:30:00Z", 25.5, "input"),
            tx("2024-06-15T12:00:00Z", 10.0, "output"),
            tx("2024-05-02T12:00:00Z", 999.0, "transfer"),
            tx("garbage", 500.0, "income"),
        ]
    }

    #[test]
    fn test_empty_input_yields_no_data() {
        let service = AggregationService::new();
        for granularity in [Granularity::Daily, Granularity::Monthly] {
            let series = service.aggregate(&[], granularity);
            assert!(series.is_empty());
            assert!(series.labels.is_empty());
            assert_eq!(series.total_income, 0.0);
            assert_eq!(series.total_expense, 0.0);
        }
    }

    #[test]
    fn test_daily_buckets_and_labels() {
        let service = AggregationService::new();
        let series = service.aggregate(&sample_transactions(), Granularity::Daily);

        assert_eq!(series.labels, vec!["01.05", "03.05", "15.06"]);
        assert_eq!(series.income_values, vec![0.0, 125.5, 0.0]);
        assert_eq!(series.expense_values, vec![40.0, 0.0, 10.0]);
    }

    #[test]
    fn test_daily_bucket_keys_are_iso_dates() {
        let service = AggregationService::new();
        let buckets = service.build_buckets(&sample_transactions(), Granularity::Daily);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-05-01", "2024-05-03", "2024-06-15"]);
    }

    #[test]
    fn test_monthly_buckets_and_labels() {
        let service = AggregationService::new();
        let series = service.aggregate(&sample_transactions(), Granularity::Monthly);

        assert_eq!(series.labels, vec!["Май", "Июн"]);
        assert_eq!(series.income_values, vec![125.5, 0.0]);
        assert_eq!(series.expense_values, vec![40.0, 10.0]);

        let keys: Vec<String> = service
            .build_buckets(&sample_transactions(), Granularity::Monthly)
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(keys, vec!["4", "5"]);
    }

    #[test]
    fn test_totals_do_not_depend_on_granularity() {
        let service = AggregationService::new();
        let daily = service.aggregate(&sample_transactions(), Granularity::Daily);
        let monthly = service.aggregate(&sample_transactions(), Granularity::Monthly);

        assert_eq!(daily.total_income, 125.5);
        assert_eq!(daily.total_expense, 50.0);
        assert_eq!(daily.total_income, monthly.total_income);
        assert_eq!(daily.total_expense, monthly.total_expense);
    }

    #[test]
    fn test_minute_precision_offsets_count_towards_totals() {
        let transactions = vec![
            tx("2024-05-10T08:00Z", 6.0, "income"),
            tx("2024-05-10T08:00:00.5Z", 7.0, "INCOME"),
            tx("2024-5-9", 1.0, "income"),
            tx("2024-05-10T09:15+03:00", 4.0, "outcome"),
        ];
        let series = AggregationService::new().aggregate(&transactions, Granularity::Daily);

        assert_eq!(series.total_income, 14.0);
        assert_eq!(series.total_expense, 4.0);
        assert_eq!(series.income_values, vec![1.0, 13.0]);
        assert_eq!(series.expense_values, vec![0.0, 4.0]);
        assert_eq!(series.labels, vec!["09.05", "10.05"]);
    }

    #[test]
    fn test_series_have_equal_length() {
        let service = AggregationService::new();
        let series = service.aggregate(&sample_transactions(), Granularity::Daily);
        assert_eq!(series.income_values.len(), series.expense_values.len());
        assert_eq!(series.income_values.len(), series.labels.len());
    }

    #[test]
    fn test_daily_order_across_month_boundary() {
        let service = AggregationService::new();
        let transactions = vec![
            tx("2024-02-01T08:00:00Z", 5.0, "income"),
            tx("2024-01-31T20:00:00Z", 7.0, "income"),
            tx("2024-02-10T08:00:00Z", 1.0, "outcome"),
            tx("2024-01-09T08:00:00Z", 2.0, "outcome"),
        ];
        let series = service.aggregate(&transactions, Granularity::Daily);
        assert_eq!(series.labels, vec!["09.01", "31.01", "01.02", "10.02"]);
        assert_eq!(series.income_values, vec![0.0, 7.0, 5.0, 0.0]);
    }

    #[test]
    fn test_monthly_order_is_numeric() {
        let service = AggregationService::new();
        let transactions = vec![
            tx("2024-12-05", 1.0, "income"),
            tx("2024-02-05", 2.0, "income"),
            tx("2024-10-05", 3.0, "income"),
            tx("2024-01-05", 4.0, "income"),
        ];
        let series = service.aggregate(&transactions, Granularity::Monthly);
        // "10" and "12" must not sort before "2"
        assert_eq!(series.labels, vec!["Янв", "Фев", "Окт", "Дек"]);
        assert_eq!(series.income_values, vec![4.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_monthly_ignores_year() {
        let service = AggregationService::new();
        let transactions = vec![
            tx("2023-03-01", 10.0, "income"),
            tx("2024-03-01", 15.0, "income"),
        ];
        let series = service.aggregate(&transactions, Granularity::Monthly);
        assert_eq!(series.labels, vec!["Мар"]);
        assert_eq!(series.income_values, vec![25.0]);
    }

    #[test]
    fn test_only_ignored_transactions_yield_no_buckets() {
        let service = AggregationService::new();
        let transactions = vec![tx("2024-03-01", 10.0, "refund"), tx("2024-03-02", 3.0, "")];
        let series = service.aggregate(&transactions, Granularity::Daily);
        assert!(series.is_empty());
        assert_eq!(series.total_income, 0.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let service = AggregationService::new();
        let transactions = sample_transactions();
        let first = service.aggregate(&transactions, Granularity::Daily);
        let second = service.aggregate(&transactions, Granularity::Daily);
        assert_eq!(first, second);
    }

    #[test]
    fn test_granularity_from_period() {
        assert_eq!(Granularity::from(AnalyticsPeriod::Month), Granularity::Daily);
        assert_eq!(Granularity::from(AnalyticsPeriod::Year), Granularity::Monthly);
        assert_eq!(Granularity::from(AnalyticsPeriod::Custom), Granularity::Daily);
    }

    #[test]
    fn test_into_chart_data() {
        let service = AggregationService::new();
        let data: ChartData = service
            .aggregate(&sample_transactions(), Granularity::Monthly)
            .into();
        assert_eq!(data.income, 125.5);
        assert_eq!(data.expenses, 50.0);
        assert_eq!(data.labels.len(), data.income_data.len());
    }
}
