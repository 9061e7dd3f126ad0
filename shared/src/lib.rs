use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw transaction as returned by the account history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTransaction {
    /// Creation timestamp (ISO 8601 or any parseable date string)
    pub created_at: String,
    /// Raw transaction kind, e.g. "income", "outcome", "input", "output"
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Transaction amount (non-negative)
    pub count: f64,
    /// Free-form category assigned by the bank
    #[serde(default)]
    pub category: String,
}

/// Query parameters for the account history endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Account name
    pub name: String,
    /// Inclusive start of the period (YYYY-MM-DD)
    pub from_date: Option<String>,
    /// Inclusive end of the period (YYYY-MM-DD)
    pub to_date: Option<String>,
    /// Optional transaction type filter (input/output/income/outcome)
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub name: String,
    pub transaction: Vec<HistoryTransaction>,
    pub limit_data: u32,
}

/// Aggregated income/expense series consumed by the chart
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Total income over the whole period
    pub income: f64,
    /// Total expenses over the whole period
    pub expenses: f64,
    pub income_data: Vec<f64>,
    pub expenses_data: Vec<f64>,
    pub labels: Vec<String>,
}

impl ChartData {
    /// "No data" result: zero totals and empty series
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_data(&self) -> bool {
        !self.income_data.is_empty() || !self.expenses_data.is_empty()
    }
}

/// Period options offered by the analytics period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    #[default]
    Month,
    Year,
    Custom,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Month => "month",
            AnalyticsPeriod::Year => "year",
            AnalyticsPeriod::Custom => "custom",
        }
    }

    /// Only a custom period is picked through the date range calendar
    pub fn opens_range_picker(&self) -> bool {
        matches!(self, AnalyticsPeriod::Custom)
    }
}

impl fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown analytics period: {0} (expected month, year or custom)")]
pub struct PeriodParseError(pub String);

impl FromStr for AnalyticsPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(AnalyticsPeriod::Month),
            "year" => Ok(AnalyticsPeriod::Year),
            "custom" => Ok(AnalyticsPeriod::Custom),
            other => Err(PeriodParseError(other.to_string())),
        }
    }
}

/// Committed custom period emitted by the range picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDateRange {
    /// Inclusive start date (YYYY-MM-DD)
    pub from: String,
    /// Inclusive end date (YYYY-MM-DD)
    pub to: String,
}

/// A point on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Horizontal gridline at a given value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub value: f64,
    pub y: f64,
    /// Currency-formatted display label
    pub label: String,
}

/// Label under the x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Drawable chart geometry, independent of any rendering technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub income_path: Vec<ChartPoint>,
    pub expense_path: Vec<ChartPoint>,
    pub grid_lines: Vec<GridLine>,
    pub x_ticks: Vec<AxisTick>,
    pub viewport: ViewportSize,
}

impl ChartGeometry {
    /// Placeholder geometry: nothing to draw, render the "no data" message instead
    pub fn empty(viewport: ViewportSize) -> Self {
        Self {
            income_path: Vec::new(),
            expense_path: Vec::new(),
            grid_lines: Vec::new(),
            x_ticks: Vec::new(),
            viewport,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income_path.is_empty() && self.expense_path.is_empty()
    }

    /// SVG path data (`M x y L x y ...`) for a polyline, empty for no points
    pub fn svg_path(points: &[ChartPoint]) -> String {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {} {}", if i == 0 { "M" } else { "L" }, p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
