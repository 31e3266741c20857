/// Chart series for the prediction pie and the weekly metrics line chart.
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use super::stats::{LabelCounts, WeeklyPoint};

/// Slice colours, assigned by position modulo the palette length.
pub const PALETTE: [&str; 4] = ["#ec4899", "#f472b6", "#fbcfe8", "#f9a8d4"];

/// Line colour of the jitter series.
pub const JITTER_LINE_COLOR: &str = "#ec4899";

/// Line colour of the shimmer series.
pub const SHIMMER_LINE_COLOR: &str = "#f9a8d4";

// ---------------------------------------------------------------------------
// Prediction distribution
// ---------------------------------------------------------------------------

/// One slice of the prediction distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: u64,
    pub color: &'static str,
}

/// Palette colour for the slice at `index`.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Convert the label histogram into ordered chart slices.
///
/// Order follows the histogram; no ranking is applied.
pub fn distribution_series(distribution: &LabelCounts) -> Vec<ChartSlice> {
    distribution
        .iter()
        .enumerate()
        .map(|(index, (name, value))| ChartSlice {
            name: name.to_string(),
            value,
            color: palette_color(index),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Weekly metrics
// ---------------------------------------------------------------------------

/// A line drawn on the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSeries {
    /// Key of the value in each [`WeeklyChartPoint`].
    pub key: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

/// The two lines of the weekly chart, jitter first.
pub const WEEKLY_LINES: [LineSeries; 2] = [
    LineSeries {
        key: "jitter",
        name: "Jitter (%)",
        color: JITTER_LINE_COLOR,
    },
    LineSeries {
        key: "shimmer",
        name: "Shimmer (%)",
        color: SHIMMER_LINE_COLOR,
    },
];

/// A weekly point with its formatted x-axis tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyChartPoint {
    pub date: String,
    pub tick: String,
    pub jitter: Option<f64>,
    pub shimmer: Option<f64>,
}

/// Weekly chart: points in chronological order plus line definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyChart {
    pub points: Vec<WeeklyChartPoint>,
    pub lines: [LineSeries; 2],
}

impl WeeklyChart {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the weekly chart. An empty series yields an empty chart.
pub fn weekly_chart(points: &[WeeklyPoint]) -> WeeklyChart {
    WeeklyChart {
        points: points
            .iter()
            .map(|p| WeeklyChartPoint {
                date: p.date.clone(),
                tick: format_tick(&p.date),
                jitter: p.jitter,
                shimmer: p.shimmer,
            })
            .collect(),
        lines: WEEKLY_LINES,
    }
}

/// Format an ISO date as an axis tick, e.g. `"07 Mar"`.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Anything else
/// is returned unchanged.
pub fn format_tick(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%d %b").to_string())
        .unwrap_or_else(|| date.to_string())
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(date) {
        return Some(ts.date_naive());
    }
    let day = date.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_preserves_order_and_cycles_palette() {
        let counts = LabelCounts::new(vec![
            ("Normal".to_string(), 3),
            ("Nodule".to_string(), 1),
        ]);
        let series = distribution_series(&counts);
        assert_eq!(
            series,
            vec![
                ChartSlice { name: "Normal".into(), value: 3, color: PALETTE[0] },
                ChartSlice { name: "Nodule".into(), value: 1, color: PALETTE[1] },
            ]
        );
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(palette_color(4), PALETTE[0]);
        assert_eq!(palette_color(7), PALETTE[3]);
    }

    #[test]
    fn empty_distribution_yields_no_slices() {
        assert!(distribution_series(&LabelCounts::default()).is_empty());
    }

    #[test]
    fn ticks_for_supported_date_shapes() {
        assert_eq!(format_tick("2025-03-07T00:00:00.000Z"), "07 Mar");
        assert_eq!(format_tick("2025-03-07T10:15:00+05:30"), "07 Mar");
        assert_eq!(format_tick("2025-12-24"), "24 Dec");
        assert_eq!(format_tick("2025-12-24 08:00"), "24 Dec");
        assert_eq!(format_tick("last week"), "last week");
        assert_eq!(format_tick(""), "");
    }

    #[test]
    fn weekly_chart_keeps_chronological_points() {
        let points = vec![
            WeeklyPoint { date: "2025-03-01".into(), jitter: Some(1.0), shimmer: Some(3.0) },
            WeeklyPoint { date: "2025-03-02".into(), jitter: None, shimmer: Some(2.5) },
        ];
        let chart = weekly_chart(&points);
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[0].tick, "01 Mar");
        assert_eq!(chart.points[1].jitter, None);
        assert_eq!(chart.lines[0].color, JITTER_LINE_COLOR);
        assert!(weekly_chart(&[]).is_empty());
    }
}
