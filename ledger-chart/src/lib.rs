//! ledger-chart: turns aggregate tables into a renderer-agnostic chart spec.
//!
//! The chart is a stacked-bar figure (one band per category per sign
//! partition) with an optional net-balance overlay line on a secondary axis.
//! Rebuilding the spec is cheap; UI interactions call `build_chart` again
//! with new signals while the aggregates stay untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledger_core::{Aggregates, MonthlyCategoryBucket, SignGroup};

/// Which figure the bars show: percent-of-month shares or signed amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    #[serde(rename = "percent")]
    Percent,
    #[serde(rename = "absolute")]
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "line")]
    Line,
}

/// One plottable series. Bars stack; the line rides the secondary axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub color: Option<String>,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// The full chart description handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub series: Vec<Series>,
    pub primary_axis: AxisRange,
    pub secondary_axis: AxisRange,
}

pub const TOTAL_SERIES_NAME: &str = "Total Amount";
const TOTAL_SERIES_COLOR: &str = "#000000";

/// Build the chart spec for one (display_mode, show_total_line) interaction.
pub fn build_chart(aggs: &Aggregates, mode: DisplayMode, show_total_line: bool) -> ChartSpec {
    let mut series = Vec::new();

    if show_total_line && !aggs.totals.is_empty() {
        series.push(Series {
            name: TOTAL_SERIES_NAME.to_string(),
            kind: SeriesKind::Line,
            color: Some(TOTAL_SERIES_COLOR.to_string()),
            x: aggs.totals.iter().map(|t| t.month).collect(),
            y: aggs.totals.iter().map(|t| t.amount).collect(),
        });
    }

    for group in [SignGroup::Gain, SignGroup::Spend] {
        series.extend(bar_series(aggs, group, mode));
    }

    let limit = axis_limit(aggs);
    let primary_axis = match mode {
        DisplayMode::Percent => AxisRange { min: 0.0, max: 1.0 },
        DisplayMode::Absolute => AxisRange {
            min: -limit,
            max: limit,
        },
    };
    let secondary_axis = AxisRange {
        min: -limit,
        max: limit,
    };

    ChartSpec {
        series,
        primary_axis,
        secondary_axis,
    }
}

/// One bar series per category present in the partition, in the aggregate's
/// deterministic category order, x-positioned at the offset display month.
fn bar_series(aggs: &Aggregates, group: SignGroup, mode: DisplayMode) -> Vec<Series> {
    let buckets = aggs.buckets(group);

    let mut categories: Vec<&str> = buckets.iter().map(|b| b.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    categories
        .into_iter()
        .map(|category| {
            let points: Vec<&MonthlyCategoryBucket> = buckets
                .iter()
                .filter(|b| b.category == category)
                .collect();
            Series {
                name: category.to_string(),
                kind: SeriesKind::Bar,
                color: aggs.colors.get(category).map(str::to_string),
                x: points.iter().map(|b| b.display_month).collect(),
                y: points
                    .iter()
                    .map(|b| match mode {
                        DisplayMode::Percent => b.percent_spend,
                        DisplayMode::Absolute => b.absolute_spend,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// M = the largest monthly stack height across both partitions. Falls back
/// to 1.0 on an empty dataset so axis ranges stay well-formed.
fn axis_limit(aggs: &Aggregates) -> f64 {
    let gain_max = aggs
        .month_totals(SignGroup::Gain)
        .values()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    let spend_max = aggs
        .month_totals(SignGroup::Spend)
        .values()
        .map(|v| -v)
        .fold(f64::NEG_INFINITY, f64::max);

    let limit = gain_max.max(spend_max);
    if limit.is_finite() && limit > 0.0 {
        limit
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Transaction;

    fn txn(date: &str, category: &str, amount: f64) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction::new(date, category, amount)
    }

    fn sample() -> Aggregates {
        Aggregates::from_transactions(&[
            txn("2024-01-05", "Food", -20.0),
            txn("2024-01-20", "Food", -30.0),
            txn("2024-01-06", "Rent", -900.0),
            txn("2024-01-10", "Salary", 1000.0),
            txn("2024-02-05", "Food", -60.0),
            txn("2024-02-12", "Salary", 1100.0),
        ])
    }

    #[test]
    fn test_total_line_toggle_removes_only_the_line() {
        let aggs = sample();
        let with = build_chart(&aggs, DisplayMode::Percent, true);
        let without = build_chart(&aggs, DisplayMode::Percent, false);

        assert_eq!(with.series.len(), without.series.len() + 1);
        assert_eq!(with.series[0].name, TOTAL_SERIES_NAME);
        assert_eq!(with.series[0].kind, SeriesKind::Line);
        assert_eq!(&with.series[1..], &without.series[..]);
        assert_eq!(with.primary_axis, without.primary_axis);
        assert_eq!(with.secondary_axis, without.secondary_axis);
    }

    #[test]
    fn test_percent_mode_axis_and_values() {
        let aggs = sample();
        let spec = build_chart(&aggs, DisplayMode::Percent, false);

        assert_eq!(spec.primary_axis, AxisRange { min: 0.0, max: 1.0 });
        for s in &spec.series {
            for y in &s.y {
                assert!((0.0..=1.0).contains(y), "{}: {y} out of [0,1]", s.name);
            }
        }
    }

    #[test]
    fn test_absolute_mode_axis_limit() {
        let aggs = sample();
        let spec = build_chart(&aggs, DisplayMode::Absolute, true);

        // Jan gain total 1000, Feb gain 1100, Jan spend -950, Feb spend -60
        assert_eq!(spec.primary_axis, AxisRange { min: -1100.0, max: 1100.0 });
        assert_eq!(spec.secondary_axis, spec.primary_axis);
    }

    #[test]
    fn test_secondary_axis_fixed_in_percent_mode() {
        let aggs = sample();
        let spec = build_chart(&aggs, DisplayMode::Percent, true);
        assert_eq!(spec.secondary_axis, AxisRange { min: -1100.0, max: 1100.0 });
    }

    #[test]
    fn test_mode_switch_leaves_aggregates_untouched() {
        let aggs = sample();
        let before = aggs.clone();
        let _ = build_chart(&aggs, DisplayMode::Percent, true);
        let _ = build_chart(&aggs, DisplayMode::Absolute, false);
        assert_eq!(aggs, before);
    }

    #[test]
    fn test_category_color_consistent_across_partitions() {
        // Food appears in both partitions via a refund
        let aggs = Aggregates::from_transactions(&[
            txn("2024-01-05", "Food", -20.0),
            txn("2024-01-08", "Food", 12.0),
        ]);
        let spec = build_chart(&aggs, DisplayMode::Absolute, false);

        let food: Vec<&Series> = spec.series.iter().filter(|s| s.name == "Food").collect();
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].color, food[1].color);
        assert!(food[0].color.is_some());
    }

    #[test]
    fn test_bars_use_offset_display_months() {
        let aggs = sample();
        let spec = build_chart(&aggs, DisplayMode::Absolute, false);

        let salary = spec.series.iter().find(|s| s.name == "Salary").unwrap();
        assert_eq!(salary.x[0], NaiveDate::from_ymd_opt(2023, 12, 27).unwrap());
        let food = spec.series.iter().find(|s| s.name == "Food").unwrap();
        assert_eq!(food.x[0], NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn test_empty_dataset_degenerates_safely() {
        let aggs = Aggregates::from_transactions(&[]);
        let spec = build_chart(&aggs, DisplayMode::Percent, true);

        assert!(spec.series.is_empty());
        assert_eq!(spec.primary_axis, AxisRange { min: 0.0, max: 1.0 });
        assert_eq!(spec.secondary_axis, AxisRange { min: -1.0, max: 1.0 });
    }

    #[test]
    fn test_spec_serializes_to_json() {
        let spec = build_chart(&sample(), DisplayMode::Percent, true);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"kind\":\"line\""));
        assert!(json.contains("\"kind\":\"bar\""));
    }
}
