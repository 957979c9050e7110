//! Plotting data derived from metrics results, free of any drawing.

use chrono::NaiveDate;
use fear_greed_analytics::{CategoryProfit, CorrelationMatrix, DailySummary};
use fear_greed_core::Classification;
use fear_greed_data::MergedRecord;
use plotters::style::RGBColor;

use crate::style::coolwarm;

/// Marker area bounds in square points, smallest to largest trade.
pub const MARKER_AREA_POINTS: (f64, f64) = (20.0, 200.0);

/// One bar per sentiment category, in fixed category order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    pub title: &'static str,
    pub y_desc: &'static str,
    /// Bar heights; undefined values are drawn as zero-height bars.
    pub values: [f64; 5],
    /// Text drawn at the end of each bar.
    pub labels: [String; 5],
}

impl BarChartData {
    fn new(
        title: &'static str,
        y_desc: &'static str,
        values: [f64; 5],
        format: impl Fn(f64) -> String,
    ) -> Self {
        Self {
            title,
            y_desc,
            labels: values.map(format),
            values,
        }
    }

    pub fn distribution(counts: [usize; 5]) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let values = counts.map(|c| c as f64);
        Self::new(
            "Distribution of Market Sentiment",
            "Count",
            values,
            |v| format!("{v}"),
        )
    }

    pub fn mean_profit(profits: &[CategoryProfit]) -> Self {
        let mut values = [f64::NAN; 5];
        for profit in profits {
            values[profit.classification.index()] = profit.mean_profit;
        }
        Self::new(
            "Average Profit by Market Sentiment",
            "Average Profit (USD)",
            values,
            |v| format!("{v:.2}"),
        )
    }

    pub fn win_rate(rates: [f64; 5]) -> Self {
        Self::new(
            "Win Rate by Market Sentiment",
            "Win Rate",
            rates,
            |v| format!("{:.1}%", v * 100.0),
        )
    }

    pub fn volume(volumes: [f64; 5]) -> Self {
        Self::new(
            "Trading Volume by Market Sentiment",
            "Volume (USD)",
            volumes,
            |v| format!("{v:.0}"),
        )
    }

    /// Bar height to draw: the value, or zero when undefined.
    #[must_use]
    pub fn height(&self, index: usize) -> f64 {
        let v = self.values[index];
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }

    /// Whether the label of bar `index` sits below its end rather than above.
    #[must_use]
    pub fn label_below(&self, index: usize) -> bool {
        self.height(index) < 0.0
    }

    /// Vertical axis range covering zero and every bar, with headroom for labels.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        let heights: Vec<f64> = (0..5).map(|i| self.height(i)).collect();
        let max = heights.iter().copied().fold(0.0, f64::max);
        let min = heights.iter().copied().fold(0.0, f64::min);
        let span = max - min;
        if span <= 0.0 {
            return (0.0, 1.0);
        }
        let pad = span * 0.1;
        let lower = if min < 0.0 { min - pad } else { 0.0 };
        (lower, max + pad)
    }

    #[must_use]
    pub fn category_names() -> [&'static str; 5] {
        Classification::ALL.map(|c| c.as_str())
    }
}

/// One day on the shared time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    /// Days since [`TimeSeriesData::start`].
    pub offset: f64,
    /// Mean sentiment; NaN when no trade that day carried one.
    pub sentiment: f64,
    pub pnl: f64,
}

/// Daily sentiment line and daily PnL bars on one date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesData {
    pub start: NaiveDate,
    pub points: Vec<TimeSeriesPoint>,
}

impl TimeSeriesData {
    /// Returns `None` when there are no days to plot.
    #[must_use]
    pub fn from_daily(days: &[DailySummary]) -> Option<Self> {
        let start = days.first()?.date;
        #[allow(clippy::cast_precision_loss)]
        let points = days
            .iter()
            .map(|d| TimeSeriesPoint {
                offset: (d.date - start).num_days() as f64,
                sentiment: d.mean_sentiment,
                pnl: d.total_pnl,
            })
            .collect();
        Some(Self { start, points })
    }

    /// Offset of the last day, at least 1 so the axis never collapses.
    #[must_use]
    pub fn span_days(&self) -> f64 {
        self.points
            .last()
            .map_or(1.0, |p| p.offset)
            .max(1.0)
    }

    /// Calendar date at `offset` days from the start, rounded to the nearest day.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn date_at(&self, offset: f64) -> NaiveDate {
        self.start + chrono::Duration::days(offset.round() as i64)
    }

    /// Range of the daily PnL bars, always including zero.
    #[must_use]
    pub fn pnl_range(&self) -> (f64, f64) {
        let max = self.points.iter().map(|p| p.pnl).fold(0.0, f64::max);
        let min = self.points.iter().map(|p| p.pnl).fold(0.0, f64::min);
        if max - min <= 0.0 {
            (-1.0, 1.0)
        } else {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        }
    }
}

/// One trade in the size vs sentiment scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub sentiment: f64,
    pub size_usd: f64,
    pub color: RGBColor,
    /// Marker radius in points.
    pub radius_points: f64,
}

/// Scatter markers for every trade with sentiment, size and PnL present.
///
/// Colour runs from blue (largest loss) to red (largest profit) around zero,
/// and marker area grows linearly with USD size.
#[must_use]
pub fn scatter_points(rows: &[MergedRecord]) -> Vec<ScatterPoint> {
    let complete: Vec<(f64, f64, f64)> = rows
        .iter()
        .filter_map(|r| Some((r.sentiment_value?, r.size_usd()?, r.closed_pnl()?)))
        .filter(|(x, y, p)| x.is_finite() && y.is_finite() && p.is_finite())
        .collect();

    let max_abs_pnl = complete.iter().map(|c| c.2.abs()).fold(0.0, f64::max);
    let min_size = complete.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_size = complete.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    complete
        .into_iter()
        .map(|(sentiment, size_usd, pnl)| {
            let t = if max_abs_pnl > 0.0 { pnl / max_abs_pnl } else { 0.0 };
            ScatterPoint {
                sentiment,
                size_usd,
                color: coolwarm(t),
                radius_points: marker_radius(size_usd, min_size, max_size),
            }
        })
        .collect()
}

/// Radius in points of a marker whose area is interpolated over
/// [`MARKER_AREA_POINTS`] by `size` within `[min, max]`.
#[must_use]
pub fn marker_radius(size: f64, min: f64, max: f64) -> f64 {
    let (small, large) = MARKER_AREA_POINTS;
    let w = if max > min {
        ((size - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    (small + (large - small) * w).sqrt() / 2.0
}

/// One visible cell of the correlation heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    pub color: RGBColor,
    pub annotation: String,
}

/// Cells strictly below the diagonal; the diagonal and upper triangle are masked.
#[must_use]
pub fn heatmap_cells(matrix: &CorrelationMatrix) -> Vec<HeatmapCell> {
    let n = matrix.labels.len();
    let mut cells = Vec::new();
    for row in 0..n {
        for col in 0..row {
            let value = matrix.get(row, col);
            cells.push(HeatmapCell {
                row,
                col,
                value,
                color: coolwarm(value),
                annotation: format!("{value:.2}"),
            });
        }
    }
    cells
}
