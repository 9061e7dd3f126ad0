//! # Chart Geometry Module
//!
//! Maps aggregated income/expense series onto a fixed-size drawing surface.
//!
//! ## Key Functions:
//! - `map_to_geometry()` - Pure mapping of a [`ChartSeries`] to points, gridlines and x-axis ticks
//! - `format_currency()` - Gridline label formatting
//!
//! Both series share one vertical scale so the lines are directly comparable.
//! A flat series still draws as one horizontal line, placed mid-height rather
//! than on the top or bottom edge.
//! The output never depends on anything but the inputs; an empty series maps
//! to an empty geometry, which the render surface shows as "no data for the
//! selected period".

use serde::{Deserialize, Serialize};
use shared::{AxisTick, ChartGeometry, ChartPoint, GridLine, ViewportSize};
use tracing::debug;

use crate::domain::aggregation_service::ChartSeries;

/// Drawing surface size and inner padding, in surface units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartViewport {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,
    pub padding_right: f64,
}

impl Default for ChartViewport {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 160.0,
            padding_top: 12.0,
            padding_bottom: 18.0,
            padding_left: 4.0,
            padding_right: 4.0,
        }
    }
}

impl ChartViewport {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.padding_left - self.padding_right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.padding_top - self.padding_bottom).max(0.0)
    }

    pub fn size(&self) -> ViewportSize {
        ViewportSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Gridline and label settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of evenly spaced gridlines when no explicit ticks are given
    pub grid_line_count: usize,
    /// Suffix appended to gridline labels
    pub currency_symbol: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_line_count: 3,
            currency_symbol: "₽".to_string(),
        }
    }
}

/// Closed value interval mapped onto the inner height
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Range from explicit ticks, or from the data when no ticks are given.
    /// A zero-width range is widened so a flat line stays off the boundaries.
    fn resolve(series: &ChartSeries, ticks: &[f64]) -> Self {
        let (min, max) = if ticks.is_empty() {
            let values = series
                .income_values
                .iter()
                .chain(series.expense_values.iter())
                .copied()
                .filter(|v| v.is_finite());
            min_max(values).unwrap_or((0.0, 0.0))
        } else {
            let (lo, hi) = min_max(ticks.iter().copied()).unwrap_or((0.0, 0.0));
            (lo.min(0.0), hi)
        };

        if min == max {
            let delta = min.abs() * 0.1;
            if delta == 0.0 {
                Self { min, max: min + 1.0 }
            } else {
                Self {
                    min: min - delta,
                    max: max + delta,
                }
            }
        } else {
            Self { min, max }
        }
    }

    /// Position of `value` within the range, clamped to [0, 1]
    fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if !value.is_finite() || span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Map a series onto the viewport.
///
/// `tick_values` sets the gridlines explicitly and fixes the vertical scale to
/// `[min(0, lowest tick), highest tick]`; values above the ceiling are clamped
/// to the top edge. Without ticks the scale spans the data and
/// `grid.grid_line_count` evenly spaced gridlines are generated.
pub fn map_to_geometry(
    series: &ChartSeries,
    viewport: &ChartViewport,
    tick_values: Option<&[f64]>,
    grid: &GridConfig,
) -> ChartGeometry {
    if series.is_empty() {
        return ChartGeometry::empty(viewport.size());
    }

    let ticks: Vec<f64> = tick_values
        .unwrap_or_default()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    let point_count = series.point_count();
    let step = viewport.inner_width() / point_count.saturating_sub(1).max(1) as f64;
    let range = ValueRange::resolve(series, &ticks);
    let inner_height = viewport.inner_height();

    let x_at = |index: usize| viewport.padding_left + index as f64 * step;
    let y_at = |value: f64| {
        viewport.padding_top + inner_height - range.normalize(value) * inner_height
    };

    let project = |values: &[f64]| -> Vec<ChartPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ChartPoint { x: x_at(i), y: y_at(v) })
            .collect()
    };

    let grid_values = if ticks.is_empty() {
        evenly_spaced(range.min, range.max, grid.grid_line_count)
    } else {
        ticks
    };

    let grid_lines = grid_values
        .into_iter()
        .map(|value| GridLine {
            value,
            y: y_at(value),
            label: format_currency(value, &grid.currency_symbol),
        })
        .collect();

    let x_ticks = series
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| AxisTick {
            x: x_at(i),
            label: label.clone(),
        })
        .collect();

    debug!(
        "📈 GEOMETRY: {} points, range {:.2}..{:.2}, step {:.2}",
        point_count, range.min, range.max, step
    );

    ChartGeometry {
        income_path: project(&series.income_values),
        expense_path: project(&series.expense_values),
        grid_lines,
        x_ticks,
        viewport: viewport.size(),
    }
}

fn evenly_spaced(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![(min + max) / 2.0],
        n => (0..n)
            .map(|k| min + (max - min) * k as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Format a money amount the ru-RU way: `1 234 567,89 ₽`.
///
/// Thousands are grouped with a no-break space, the decimal separator is a
/// comma and two fraction digits are always shown. An empty symbol omits the
/// suffix.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 * 2);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(digit);
    }

    let rounds_to_zero = whole.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');
    let sign = if value < 0.0 && !rounds_to_zero { "-" } else { "" };
    if symbol.is_empty() {
        format!("{}{},{}", sign, grouped, fraction)
    } else {
        format!("{}{},{}\u{a0}{}", sign, grouped, fraction, symbol)
    }
}

/// Mapper bound to a viewport and grid configuration
#[derive(Debug, Clone, Default)]
pub struct ChartGeometryService {
    viewport: ChartViewport,
    grid: GridConfig,
}

impl ChartGeometryService {
    pub fn new(viewport: ChartViewport, grid: GridConfig) -> Self {
        Self { viewport, grid }
    }

    pub fn viewport(&self) -> &ChartViewport {
        &self.viewport
    }

    /// Geometry with generated gridlines
    pub fn build_geometry(&self, series: &ChartSeries) -> ChartGeometry {
        map_to_geometry(series, &self.viewport, None, &self.grid)
    }

    /// Geometry with caller-chosen gridline values
    pub fn build_geometry_with_ticks(
        &self,
        series: &ChartSeries,
        tick_values: &[f64],
    ) -> ChartGeometry {
        map_to_geometry(series, &self.viewport, Some(tick_values), &self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(income: &[f64], expense: &[f64]) -> ChartSeries {
        let len = income.len().max(expense.len());
        ChartSeries {
            total_income: income.iter().sum(),
            total_expense: expense.iter().sum(),
            income_values: income.to_vec(),
            expense_values: expense.to_vec(),
            labels: (0..len).map(|i| format!("{:02}.05", i + 1)).collect(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_series_gives_empty_geometry() {
        let viewport = ChartViewport::default();
        let grid = GridConfig::default();
        let geometry = map_to_geometry(&ChartSeries::default(), &viewport, None, &grid);
        assert!(geometry.is_empty());
        assert!(geometry.grid_lines.is_empty());
        assert!(geometry.x_ticks.is_empty());
        assert_eq!(geometry.viewport, ViewportSize { width: 320.0, height: 160.0 });
    }

    #[test]
    fn test_empty_series_with_ticks_is_still_empty() {
        let viewport = ChartViewport::default();
        let grid = GridConfig::default();
        let ticks = [0.0, 100.0];
        let geometry = map_to_geometry(&ChartSeries::default(), &viewport, Some(&ticks), &grid);
        assert!(geometry.is_empty());
    }

    #[test]
    fn test_flat_series_sits_inside_plot_area_with_uniform_spacing() {
        let viewport = ChartViewport::default();
        let flat = series(&[100.0, 100.0, 100.0], &[]);
        let geometry = map_to_geometry(&flat, &viewport, None, &GridConfig::default());

        let top = viewport.padding_top;
        let bottom = viewport.padding_top + viewport.inner_height();
        // every point shares one y; widening only keeps it off the edges
        let mid = (top + bottom) / 2.0;
        for point in &geometry.income_path {
            assert!(point.y > top && point.y < bottom, "on a boundary: {}", point.y);
            assert!(approx(point.y, mid));
        }

        let xs: Vec<f64> = geometry.income_path.iter().map(|p| p.x).collect();
        assert!(approx(xs[1] - xs[0], xs[2] - xs[1]));
        assert!(approx(xs[0], viewport.padding_left));
        assert!(approx(xs[2], viewport.width - viewport.padding_right));
    }

    #[test]
    fn test_flat_zero_series_uses_unit_range() {
        let viewport = ChartViewport::default();
        let zeros = series(&[0.0, 0.0], &[0.0, 0.0]);
        let geometry = map_to_geometry(&zeros, &viewport, None, &GridConfig::default());
        let bottom = viewport.padding_top + viewport.inner_height();
        assert!(geometry.income_path.iter().all(|p| approx(p.y, bottom)));
        assert_eq!(geometry.grid_lines.last().unwrap().value, 1.0);
    }

    #[test]
    fn test_single_point_is_placed_at_left_padding() {
        let viewport = ChartViewport::default();
        let single = series(&[50.0], &[20.0]);
        let geometry = map_to_geometry(&single, &viewport, None, &GridConfig::default());
        assert_eq!(geometry.income_path.len(), 1);
        assert!(approx(geometry.income_path[0].x, viewport.padding_left));
        assert!(geometry.income_path[0].y.is_finite());
    }

    #[test]
    fn test_min_and_max_hit_inner_edges() {
        let viewport = ChartViewport::default();
        let data = series(&[10.0, 50.0], &[30.0, 20.0]);
        let geometry = map_to_geometry(&data, &viewport, None, &GridConfig::default());

        let top = viewport.padding_top;
        let bottom = viewport.padding_top + viewport.inner_height();
        assert!(approx(geometry.income_path[0].y, bottom));
        assert!(approx(geometry.income_path[1].y, top));
        // 30 sits halfway between 10 and 50
        assert!(approx(geometry.expense_path[0].y, (top + bottom) / 2.0));
    }

    #[test]
    fn test_explicit_ticks_set_ceiling_and_clamp() {
        let viewport = ChartViewport::default();
        let ticks = [0.0, 50.0, 100.0];
        let data = series(&[25.0, 250.0], &[100.0, 0.0]);
        let geometry = map_to_geometry(&data, &viewport, Some(&ticks), &GridConfig::default());

        let top = viewport.padding_top;
        let bottom = viewport.padding_top + viewport.inner_height();
        assert!(approx(geometry.income_path[1].y, top), "value above ceiling must clamp");
        assert!(approx(geometry.expense_path[0].y, top));
        assert!(approx(geometry.expense_path[1].y, bottom));

        let values: Vec<f64> = geometry.grid_lines.iter().map(|g| g.value).collect();
        assert_eq!(values, ticks.to_vec());
        assert!(approx(geometry.grid_lines[1].y, (top + bottom) / 2.0));
    }

    #[test]
    fn test_generated_grid_lines() {
        let viewport = ChartViewport::default();
        let grid = GridConfig {
            grid_line_count: 5,
            currency_symbol: "₽".to_string(),
        };
        let geometry = map_to_geometry(&series(&[0.0, 400.0], &[]), &viewport, None, &grid);
        let values: Vec<f64> = geometry.grid_lines.iter().map(|g| g.value).collect();
        assert_eq!(values, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
        assert_eq!(geometry.grid_lines[1].label, "100,00\u{a0}₽");
    }

    #[test]
    fn test_x_ticks_follow_labels() {
        let viewport = ChartViewport::default();
        let data = series(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]);
        let geometry = map_to_geometry(&data, &viewport, None, &GridConfig::default());
        assert_eq!(geometry.x_ticks.len(), 3);
        assert_eq!(geometry.x_ticks[2].label, "03.05");
        assert!(approx(geometry.x_ticks[1].x, geometry.income_path[1].x));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let service = ChartGeometryService::default();
        let s = series(&[10.0, 20.0, 5.0], &[7.0, 0.0, 12.0]);
        assert_eq!(service.build_geometry(&s), service.build_geometry(&s));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, "₽"), "0,00\u{a0}₽");
        assert_eq!(format_currency(1234567.891, "₽"), "1\u{a0}234\u{a0}567,89\u{a0}₽");
        assert_eq!(format_currency(999.999, ""), "1\u{a0}000,00");
        assert_eq!(format_currency(-1500.5, "₽"), "-1\u{a0}500,50\u{a0}₽");
        assert_eq!(format_currency(f64::NAN, ""), "0,00");
        assert_eq!(format_currency(-0.001, ""), "0,00");
    }

    #[test]
    fn test_format_currency_beyond_integer_range() {
        assert_eq!(
            format_currency(1e20, "₽"),
            "100\u{a0}000\u{a0}000\u{a0}000\u{a0}000\u{a0}000\u{a0}000,00\u{a0}₽"
        );

        let huge = format_currency(1e300, "");
        assert!(huge.starts_with("1\u{a0}000\u{a0}"));
        assert!(huge.ends_with(",00"));
        assert_eq!(huge.chars().filter(|c| c.is_ascii_digit()).count(), 303);
    }
}
