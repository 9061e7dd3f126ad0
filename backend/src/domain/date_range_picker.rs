//! Date range picker domain logic.
//!
//! The picker shows two consecutive months and lets the user choose an
//! inclusive `start..=end` pair by clicking days. The selection itself is a
//! small finite state machine ([`RangeSelection`]) driven by a pure reducer;
//! [`DateRangePicker`] wraps it with the session concerns (today's date, the
//! visible months, apply/close).
//!
//! ## Rules
//!
//! - Future days are never selectable; clicking one leaves the state unchanged.
//! - The second click completes the range; clicking an earlier day than the
//!   start swaps the pair so that `start <= end` always holds.
//! - A click on a complete range starts a new range instead of extending it.
//! - Apply is only possible with a complete range and fires `on_apply` once.
//!   Close fires `on_close` and drops whatever was in progress.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::AppliedDateRange;
use tracing::{debug, info};

use crate::domain::date_utils::{
    days_in_month, first_day_of_month, format_iso_date, next_month, parse_iso_date, previous_month,
};

/// Full month names for the picker header
pub const MONTH_NAMES: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь", "Октябрь",
    "Ноябрь", "Декабрь",
];

/// Inclusive date range with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two dates in any order
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn to_applied(&self) -> AppliedDateRange {
        AppliedDateRange {
            from: format_iso_date(self.start),
            to: format_iso_date(self.end),
        }
    }

    /// Parse an applied range; `None` if either side is not a `YYYY-MM-DD` date
    pub fn from_applied(applied: &AppliedDateRange) -> Option<Self> {
        let from = parse_iso_date(&applied.from)?;
        let to = parse_iso_date(&applied.to)?;
        Some(Self::new(from, to))
    }
}

/// In-progress selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSelection {
    /// Nothing picked yet
    #[default]
    Empty,
    /// First day picked
    StartOnly { start: NaiveDate },
    /// Both ends picked, `start <= end`
    Complete { start: NaiveDate, end: NaiveDate },
}

impl RangeSelection {
    /// Initial state from a caller-provided pair
    pub fn seeded(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => {
                let range = DateRange::new(start, end);
                RangeSelection::Complete {
                    start: range.start,
                    end: range.end,
                }
            }
            (Some(day), None) | (None, Some(day)) => RangeSelection::StartOnly { start: day },
            (None, None) => RangeSelection::Empty,
        }
    }

    /// Transition on a day click
    pub fn on_day_clicked(self, day: NaiveDate, is_future: bool) -> Self {
        if is_future {
            return self;
        }

        match self {
            RangeSelection::Empty | RangeSelection::Complete { .. } => {
                RangeSelection::StartOnly { start: day }
            }
            RangeSelection::StartOnly { start } if day < start => RangeSelection::Complete {
                start: day,
                end: start,
            },
            RangeSelection::StartOnly { start } => RangeSelection::Complete { start, end: day },
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        match self {
            RangeSelection::Empty => None,
            RangeSelection::StartOnly { start } | RangeSelection::Complete { start, .. } => {
                Some(*start)
            }
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            RangeSelection::Complete { end, .. } => Some(*end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RangeSelection::Complete { .. })
    }

    pub fn range(&self) -> Option<DateRange> {
        match self {
            RangeSelection::Complete { start, end } => Some(DateRange {
                start: *start,
                end: *end,
            }),
            _ => None,
        }
    }
}

/// Receiver of the picker's outcome
pub trait RangePickerHandler {
    /// A complete range was confirmed
    fn on_apply(&mut self, range: AppliedDateRange);

    /// The picker was dismissed without applying
    fn on_close(&mut self);
}

/// How a day cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCellState {
    Future,
    RangeStart,
    RangeEnd,
    InRange,
    Selectable,
}

/// One cell of a month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerCell {
    /// Empty slot before the first or after the last day of the month
    Padding,
    Day { date: NaiveDate, state: DayCellState },
}

/// Month grid, Monday first, padded to whole weeks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthView {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub title: String,
    pub cells: Vec<PickerCell>,
}

/// One picker session
#[derive(Debug, Clone)]
pub struct DateRangePicker {
    selection: RangeSelection,
    today: NaiveDate,
    /// First day of the right-hand visible month
    right_month: NaiveDate,
}

impl DateRangePicker {
    /// Open a picker, optionally pre-filled with the currently committed range
    pub fn new(today: NaiveDate, initial: Option<DateRange>) -> Self {
        let selection = RangeSelection::seeded(initial.map(|r| r.start), initial.map(|r| r.end));
        let anchor = initial.map(|r| r.end).unwrap_or(today).min(today);

        info!("📅 PICKER: opened on {} with {:?}", today, selection);

        Self {
            selection,
            today,
            right_month: first_day_of_month(anchor),
        }
    }

    pub fn selection(&self) -> RangeSelection {
        self.selection
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_future(&self, day: NaiveDate) -> bool {
        day > self.today
    }

    /// Handle a click on `day`. Returns `false` when the click was ignored.
    pub fn click_day(&mut self, day: NaiveDate) -> bool {
        let is_future = self.is_future(day);
        self.selection = self.selection.on_day_clicked(day, is_future);
        debug!("📅 PICKER: click {} (future: {}) -> {:?}", day, is_future, self.selection);
        !is_future
    }

    /// The two visible months, left then right
    pub fn visible_months(&self) -> [CalendarMonthView; 2] {
        [
            self.month_view(previous_month(self.right_month)),
            self.month_view(self.right_month),
        ]
    }

    pub fn show_previous_months(&mut self) {
        self.right_month = previous_month(self.right_month);
    }

    /// Move one month forward; refused once today's month is on the right
    pub fn show_next_months(&mut self) -> bool {
        if self.right_month >= first_day_of_month(self.today) {
            return false;
        }
        self.right_month = next_month(self.right_month);
        true
    }

    pub fn cell_state(&self, day: NaiveDate) -> DayCellState {
        if self.is_future(day) {
            return DayCellState::Future;
        }
        match self.selection {
            RangeSelection::StartOnly { start } if day == start => DayCellState::RangeStart,
            RangeSelection::Complete { start, .. } if day == start => DayCellState::RangeStart,
            RangeSelection::Complete { end, .. } if day == end => DayCellState::RangeEnd,
            RangeSelection::Complete { start, end } if start < day && day < end => {
                DayCellState::InRange
            }
            _ => DayCellState::Selectable,
        }
    }

    pub fn can_apply(&self) -> bool {
        self.selection.is_complete()
    }

    /// Commit the selection. Without a complete range the picker is handed back untouched.
    pub fn apply<H: RangePickerHandler>(self, handler: &mut H) -> Result<DateRange, Self> {
        match self.selection.range() {
            Some(range) => {
                info!("📅 PICKER: applied {} .. {}", range.start, range.end);
                handler.on_apply(range.to_applied());
                Ok(range)
            }
            None => Err(self),
        }
    }

    /// Dismiss the picker, discarding the in-progress selection
    pub fn close<H: RangePickerHandler>(self, handler: &mut H) {
        info!("📅 PICKER: closed without applying ({:?})", self.selection);
        handler.on_close();
    }

    fn month_view(&self, first: NaiveDate) -> CalendarMonthView {
        let leading = first.weekday().num_days_from_monday() as usize;
        let day_count = days_in_month(first);

        let mut cells = Vec::with_capacity(42);
        cells.extend(std::iter::repeat(PickerCell::Padding).take(leading));
        for day in 1..=day_count {
            if let Some(date) = first.with_day(day) {
                cells.push(PickerCell::Day {
                    date,
                    state: self.cell_state(date),
                });
            }
        }
        while cells.len() % 7 != 0 {
            cells.push(PickerCell::Padding);
        }

        CalendarMonthView {
            year: first.year(),
            month: first.month(),
            title: format!("{} {}", MONTH_NAMES[first.month0() as usize], first.year()),
            cells,
        }
    }
}
