use chrono::NaiveDate;
use shared::AnalyticsPeriod;

use dashboard_backend::domain::{AnalyticsState, DateRange, PeriodSelectionError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_custom_bounds_commit_in_either_order() {
    let today = date(2024, 5, 20);
    let mut state = AnalyticsState::new();

    state
        .select_period_with_bounds(
            AnalyticsPeriod::Custom,
            Some(date(2024, 5, 10)),
            Some(date(2024, 5, 1)),
            today,
        )
        .unwrap();

    assert_eq!(state.selected_period, AnalyticsPeriod::Custom);
    assert!(state.picker().is_none());
    assert_eq!(
        state.query_range(today),
        Some(DateRange::new(date(2024, 5, 1), date(2024, 5, 10)))
    );
}

#[test]
fn test_custom_bounds_may_end_today() {
    let today = date(2024, 5, 20);
    let mut state = AnalyticsState::new();
    let result =
        state.select_period_with_bounds(AnalyticsPeriod::Custom, Some(today), Some(today), today);
    assert!(result.is_ok());
    assert_eq!(state.committed_range(), Some(DateRange::new(today, today)));
}

#[test]
fn test_custom_bounds_missing_side_is_rejected() {
    let today = date(2024, 5, 20);
    let mut state = AnalyticsState::new();

    let err = state
        .select_period_with_bounds(AnalyticsPeriod::Custom, Some(date(2024, 5, 1)), None, today)
        .unwrap_err();
    assert_eq!(err, PeriodSelectionError::MissingBounds);

    let err = state
        .select_period_with_bounds(AnalyticsPeriod::Custom, None, None, today)
        .unwrap_err();
    assert_eq!(err, PeriodSelectionError::MissingBounds);
    assert!(state.committed_range().is_none());
}

#[test]
fn test_future_end_is_not_selectable() {
    let today = date(2024, 5, 20);
    let mut state = AnalyticsState::new();

    let err = state
        .select_period_with_bounds(
            AnalyticsPeriod::Custom,
            Some(date(2024, 5, 1)),
            Some(date(2024, 5, 21)),
            today,
        )
        .unwrap_err();

    assert_eq!(
        err,
        PeriodSelectionError::NotSelectable {
            from: date(2024, 5, 1),
            to: date(2024, 5, 21),
            today,
        }
    );
    assert!(err.to_string().contains("2024-05-20"));
    assert!(state.picker().is_none());
    assert!(state.committed_range().is_none());
    assert_eq!(state.query_range(today), None);
}

#[test]
fn test_future_start_is_not_selectable() {
    let today = date(2024, 5, 20);
    let mut state = AnalyticsState::new();
    let result = state.select_period_with_bounds(
        AnalyticsPeriod::Custom,
        Some(date(2024, 6, 1)),
        Some(date(2024, 5, 1)),
        today,
    );
    assert!(matches!(result, Err(PeriodSelectionError::NotSelectable { .. })));
}

#[test]
fn test_fixed_periods_ignore_bounds() {
    let today = date(2024, 5, 20);
    let mut state = AnalyticsState::new();

    state
        .select_period_with_bounds(
            AnalyticsPeriod::Year,
            Some(date(2024, 3, 1)),
            Some(date(2024, 3, 5)),
            today,
        )
        .unwrap();

    assert_eq!(state.selected_period, AnalyticsPeriod::Year);
    assert!(state.committed_range().is_none());
    assert_eq!(
        state.query_range(today),
        Some(DateRange::new(date(2024, 1, 1), today))
    );
}
