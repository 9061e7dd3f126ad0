//! # Analytics State Module
//!
//! State behind the analytics page: the selected period, the committed custom
//! range, the open range picker (if any) and the latest chart. Data requests
//! are tagged with a ticket so a slow response for an older selection never
//! overwrites the chart for a newer one.

use chrono::{Datelike, NaiveDate};
use shared::{AnalyticsPeriod, AppliedDateRange, ChartData, ChartGeometry};
use tracing::{debug, info, warn};

use crate::domain::date_range_picker::{DateRange, DateRangePicker, RangePickerHandler};
use crate::domain::date_utils::first_day_of_month;

/// Date range a period covers as of `today`.
///
/// `custom` yields the committed range, or `None` while nothing was applied.
pub fn period_range(
    period: AnalyticsPeriod,
    today: NaiveDate,
    committed: Option<DateRange>,
) -> Option<DateRange> {
    match period {
        AnalyticsPeriod::Month => Some(DateRange::new(first_day_of_month(today), today)),
        AnalyticsPeriod::Year => {
            let january_first = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
            Some(DateRange::new(january_first, today))
        }
        AnalyticsPeriod::Custom => committed,
    }
}

/// Why a period given as explicit bounds could not be selected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodSelectionError {
    #[error("The custom period needs both a start and an end date")]
    MissingBounds,
    #[error("Range {from} .. {to} is not selectable (dates after {today} are not allowed)")]
    NotSelectable {
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
    },
}

/// Identifies one data request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug, Default)]
pub struct AnalyticsState {
    /// Currently selected period
    pub selected_period: AnalyticsPeriod,

    /// Chart data for the latest accepted response
    pub chart_data: ChartData,

    /// Geometry for the latest accepted response
    pub geometry: Option<ChartGeometry>,

    /// Whether a request is in flight
    pub is_loading: bool,

    committed_range: Option<DateRange>,
    picker: Option<DateRangePicker>,
    latest_request: u64,
}

impl AnalyticsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed_range(&self) -> Option<DateRange> {
        self.committed_range
    }

    pub fn picker(&self) -> Option<&DateRangePicker> {
        self.picker.as_ref()
    }

    pub fn picker_mut(&mut self) -> Option<&mut DateRangePicker> {
        self.picker.as_mut()
    }

    /// Switch period. Returns `true` when a fetch should follow right away.
    pub fn select_period(&mut self, period: AnalyticsPeriod, today: NaiveDate) -> bool {
        info!("📊 ANALYTICS: period {} -> {}", self.selected_period, period);
        self.selected_period = period;

        if period.opens_range_picker() {
            self.picker = Some(DateRangePicker::new(today, self.committed_range));
            return false;
        }

        self.picker = None;
        self.committed_range = None;
        true
    }

    /// Select `period`, committing `from..=to` through the picker for `custom`.
    ///
    /// Bounds are ignored for the fixed periods.
    pub fn select_period_with_bounds(
        &mut self,
        period: AnalyticsPeriod,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), PeriodSelectionError> {
        if !period.opens_range_picker() {
            if from.is_some() || to.is_some() {
                warn!("📊 ANALYTICS: bounds only apply to the custom period, ignoring");
            }
            self.select_period(period, today);
            return Ok(());
        }

        let (Some(from), Some(to)) = (from, to) else {
            return Err(PeriodSelectionError::MissingBounds);
        };

        self.select_period(AnalyticsPeriod::Custom, today);
        if let Some(picker) = self.picker_mut() {
            picker.click_day(from);
            picker.click_day(to);
        }
        if self.apply_picker() {
            Ok(())
        } else {
            self.close_picker();
            Err(PeriodSelectionError::NotSelectable { from, to, today })
        }
    }

    /// Apply the open picker. Returns `true` when a range was committed.
    pub fn apply_picker(&mut self) -> bool {
        let Some(picker) = self.picker.take() else {
            return false;
        };

        match picker.apply(self) {
            Ok(_) => true,
            Err(picker) => {
                debug!("📊 ANALYTICS: apply ignored, selection incomplete");
                self.picker = Some(picker);
                false
            }
        }
    }

    /// Dismiss the open picker without touching the committed range
    pub fn close_picker(&mut self) {
        if let Some(picker) = self.picker.take() {
            picker.close(self);
        }
    }

    /// Range the next request should cover
    pub fn query_range(&self, today: NaiveDate) -> Option<DateRange> {
        period_range(self.selected_period, today, self.committed_range)
    }

    /// Start a request; any earlier ticket becomes stale
    pub fn begin_request(&mut self) -> RequestTicket {
        self.latest_request += 1;
        self.is_loading = true;
        RequestTicket(self.latest_request)
    }

    /// Store a response if its ticket is still the latest one
    pub fn accept_response(
        &mut self,
        ticket: RequestTicket,
        chart_data: ChartData,
        geometry: ChartGeometry,
    ) -> bool {
        if ticket.0 != self.latest_request {
            warn!(
                "📊 ANALYTICS: dropping stale response #{} (latest #{})",
                ticket.0, self.latest_request
            );
            return false;
        }

        self.chart_data = chart_data;
        self.geometry = Some(geometry);
        self.is_loading = false;
        true
    }
}

impl RangePickerHandler for AnalyticsState {
    fn on_apply(&mut self, range: AppliedDateRange) {
        match DateRange::from_applied(&range) {
            Some(committed) => {
                self.committed_range = Some(committed);
                self.selected_period = AnalyticsPeriod::Custom;
            }
            None => warn!("📊 ANALYTICS: ignoring malformed range {:?}", range),
        }
    }

    fn on_close(&mut self) {
        debug!("📊 ANALYTICS: picker closed, committed range {:?}", self.committed_range);
    }
}
