use std::fs;
use std::path::{Path, PathBuf};

use fear_greed_analytics::{CategoryProfit, CorrelationMatrix, DailySummary};
use fear_greed_data::MergedRecord;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::error::ChartError;
use crate::prep::{heatmap_cells, scatter_points, BarChartData, TimeSeriesData};
use crate::style::{self, ChartStyle};

// Segment boundaries 0..=5 give one slot per category.
const CATEGORY_SLOTS: i32 = 5;

/// Writes PNG charts into one output directory, replacing earlier files.
pub struct ChartRenderer {
    output_dir: PathBuf,
    style: ChartStyle,
}

impl ChartRenderer {
    pub const SENTIMENT_DISTRIBUTION: &'static str = "sentiment_distribution.png";
    pub const PROFIT_BY_SENTIMENT: &'static str = "profit_by_sentiment.png";
    pub const WIN_RATE_BY_SENTIMENT: &'static str = "win_rate_by_sentiment.png";
    pub const SENTIMENT_TIME_SERIES: &'static str = "sentiment_time_series.png";
    pub const TRADE_SIZE_VS_SENTIMENT: &'static str = "trade_size_vs_sentiment.png";
    pub const CORRELATION_HEATMAP: &'static str = "correlation_heatmap.png";
    pub const VOLUME_BY_SENTIMENT: &'static str = "volume_by_sentiment.png";

    /// Opens the output directory, creating it if absent.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created
    pub fn new(output_dir: impl Into<PathBuf>, style: ChartStyle) -> Result<Self, ChartError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir, style })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Bar chart of sentiment readings per category.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn sentiment_distribution(&self, counts: [usize; 5]) -> Result<PathBuf, ChartError> {
        self.bar_chart(
            Self::SENTIMENT_DISTRIBUTION,
            &BarChartData::distribution(counts),
            (10.0, 6.0),
            None,
        )
    }

    /// Bar chart of mean trade PnL per category.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn profit_by_sentiment(&self, profits: &[CategoryProfit]) -> Result<PathBuf, ChartError> {
        self.bar_chart(
            Self::PROFIT_BY_SENTIMENT,
            &BarChartData::mean_profit(profits),
            (12.0, 8.0),
            Some(style::SKY_BLUE),
        )
    }

    /// Bar chart of win rate per category.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn win_rate_by_sentiment(&self, rates: [f64; 5]) -> Result<PathBuf, ChartError> {
        self.bar_chart(
            Self::WIN_RATE_BY_SENTIMENT,
            &BarChartData::win_rate(rates),
            (12.0, 8.0),
            None,
        )
    }

    /// Bar chart of USD volume per category.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn volume_by_sentiment(&self, volumes: [f64; 5]) -> Result<PathBuf, ChartError> {
        self.bar_chart(
            Self::VOLUME_BY_SENTIMENT,
            &BarChartData::volume(volumes),
            (12.0, 8.0),
            None,
        )
    }

    /// Daily mean sentiment (line) above daily summed PnL (bars), sharing the date axis.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn sentiment_time_series(&self, days: &[DailySummary]) -> Result<PathBuf, ChartError> {
        let path = self.output_dir.join(Self::SENTIMENT_TIME_SERIES);
        let series = TimeSeriesData::from_daily(days);
        let span = series.as_ref().map_or(1.0, TimeSeriesData::span_days);
        let (pnl_min, pnl_max) = series.as_ref().map_or((-1.0, 1.0), TimeSeriesData::pnl_range);
        let points = series.as_ref().map(|s| s.points.as_slice()).unwrap_or_default();
        let date_label = |x: &f64| {
            series
                .as_ref()
                .map(|s| s.date_at(*x).format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };

        {
            let root =
                BitMapBackend::new(&path, self.style.figure_size(16.0, 12.0)).into_drawing_area();
            root.fill(&style::BACKGROUND)?;
            let panels = root.split_evenly((2, 1));

            let mut upper = ChartBuilder::on(&panels[0])
                .caption("Sentiment Value Over Time", self.title_font())
                .margin(self.style.margin_px())
                .x_label_area_size(self.style.label_px() * 2)
                .y_label_area_size(self.style.label_px() * 5)
                .build_cartesian_2d(-0.5..span + 0.5, 0.0..100.0)?;
            upper
                .configure_mesh()
                .light_line_style(style::GRID.stroke_width(1))
                .axis_style(style::AXIS.stroke_width(1))
                .x_label_formatter(&date_label)
                .y_desc("Sentiment Value")
                .label_style(self.label_font())
                .axis_desc_style(self.axis_title_font())
                .draw()?;
            upper.draw_series(LineSeries::new(
                points
                    .iter()
                    .filter(|p| p.sentiment.is_finite())
                    .map(|p| (p.offset, p.sentiment)),
                style::LINE_BLUE.stroke_width(2),
            ))?;

            let mut lower = ChartBuilder::on(&panels[1])
                .caption("Daily Trading Profit/Loss", self.title_font())
                .margin(self.style.margin_px())
                .x_label_area_size(self.style.label_px() * 3)
                .y_label_area_size(self.style.label_px() * 5)
                .build_cartesian_2d(-0.5..span + 0.5, pnl_min..pnl_max)?;
            lower
                .configure_mesh()
                .light_line_style(style::GRID.stroke_width(1))
                .axis_style(style::AXIS.stroke_width(1))
                .x_label_formatter(&date_label)
                .x_desc("Date")
                .y_desc("Profit/Loss (USD)")
                .label_style(self.label_font())
                .axis_desc_style(self.axis_title_font())
                .draw()?;
            lower.draw_series(points.iter().map(|p| {
                Rectangle::new(
                    [(p.offset - 0.4, 0.0), (p.offset + 0.4, p.pnl)],
                    style::BAR_GREEN.filled(),
                )
            }))?;

            root.present()?;
        }

        debug!(path = %path.display(), days = days.len(), "Rendered time series");
        Ok(path)
    }

    /// Scatter of trade USD size against sentiment value, coloured by PnL.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn trade_size_vs_sentiment(&self, rows: &[MergedRecord]) -> Result<PathBuf, ChartError> {
        let path = self.output_dir.join(Self::TRADE_SIZE_VS_SENTIMENT);
        let points = scatter_points(rows);
        let max_size = points.iter().map(|p| p.size_usd).fold(0.0, f64::max);
        let y_max = if max_size > 0.0 { max_size * 1.05 } else { 1.0 };

        {
            let root =
                BitMapBackend::new(&path, self.style.figure_size(12.0, 8.0)).into_drawing_area();
            root.fill(&style::BACKGROUND)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Trade Size vs Sentiment Value", self.title_font())
                .margin(self.style.margin_px())
                .x_label_area_size(self.style.label_px() * 3)
                .y_label_area_size(self.style.label_px() * 6)
                .build_cartesian_2d(0.0..100.0, 0.0..y_max)?;
            chart
                .configure_mesh()
                .light_line_style(style::GRID.stroke_width(1))
                .axis_style(style::AXIS.stroke_width(1))
                .x_desc("Sentiment Value")
                .y_desc("Trade Size (USD)")
                .label_style(self.label_font())
                .axis_desc_style(self.axis_title_font())
                .draw()?;
            chart.draw_series(points.iter().map(|p| {
                Circle::new(
                    (p.sentiment, p.size_usd),
                    self.style.points_px(p.radius_points),
                    p.color.mix(0.7).filled(),
                )
            }))?;

            root.present()?;
        }

        debug!(path = %path.display(), points = points.len(), "Rendered scatter");
        Ok(path)
    }

    /// Lower-triangular heatmap of the correlation matrix with value annotations.
    ///
    /// # Errors
    /// Returns error if the image cannot be drawn or written
    pub fn correlation_heatmap(&self, matrix: &CorrelationMatrix) -> Result<PathBuf, ChartError> {
        let path = self.output_dir.join(Self::CORRELATION_HEATMAP);
        let labels = &matrix.labels;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let n = labels.len() as i32;
        // Row 0 is drawn at the top.
        let flip = |row: i32| n - 1 - row;

        {
            let root =
                BitMapBackend::new(&path, self.style.figure_size(12.0, 10.0)).into_drawing_area();
            root.fill(&style::BACKGROUND)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Correlation Between Metrics", self.title_font())
                .margin(self.style.margin_px())
                .x_label_area_size(self.style.label_px() * 3)
                .y_label_area_size(self.style.label_px() * 10)
                .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;
            chart
                .configure_mesh()
                .disable_mesh()
                .axis_style(style::AXIS.stroke_width(1))
                .x_labels(labels.len())
                .y_labels(labels.len())
                .x_label_formatter(&|v| segment_label(v, labels, |i| i))
                .y_label_formatter(&|v| segment_label(v, labels, flip))
                .label_style(self.label_font())
                .draw()?;

            let cells = heatmap_cells(matrix);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let slot = |c: &crate::prep::HeatmapCell| (c.col as i32, flip(c.row as i32));

            chart.draw_series(cells.iter().map(|c| {
                let (x, y) = slot(c);
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                    ],
                    c.color.filled(),
                );
                rect.set_margin(1, 1, 1, 1);
                rect
            }))?;

            let annotation = self
                .label_font()
                .into_font()
                .color(&style::TEXT)
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(cells.iter().map(|c| {
                let (x, y) = slot(c);
                Text::new(
                    c.annotation.clone(),
                    (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                    annotation.clone(),
                )
            }))?;

            root.present()?;
        }

        debug!(path = %path.display(), "Rendered correlation heatmap");
        Ok(path)
    }

    fn bar_chart(
        &self,
        file: &str,
        data: &BarChartData,
        size_in: (f64, f64),
        fill: Option<RGBColor>,
    ) -> Result<PathBuf, ChartError> {
        let path = self.output_dir.join(file);
        let names = BarChartData::category_names();
        let (y_min, y_max) = data.y_range();
        let bar_gap = self.style.points_px(6.0);

        {
            let root = BitMapBackend::new(&path, self.style.figure_size(size_in.0, size_in.1))
                .into_drawing_area();
            root.fill(&style::BACKGROUND)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(data.title, self.title_font())
                .margin(self.style.margin_px())
                .x_label_area_size(self.style.label_px() * 3)
                .y_label_area_size(self.style.label_px() * 6)
                .build_cartesian_2d((0..CATEGORY_SLOTS).into_segmented(), y_min..y_max)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .light_line_style(style::GRID.stroke_width(1))
                .axis_style(style::AXIS.stroke_width(1))
                .x_labels(names.len())
                .x_label_formatter(&|v| segment_label(v, &names, |i| i))
                .x_desc("Sentiment Category")
                .y_desc(data.y_desc)
                .label_style(self.label_font())
                .axis_desc_style(self.axis_title_font())
                .draw()?;

            chart.draw_series((0..names.len()).map(|i| {
                let color = fill.unwrap_or(style::CATEGORY_PALETTE[i]);
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let x = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(x), 0.0),
                        (SegmentValue::Exact(x + 1), data.height(i)),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, bar_gap, bar_gap);
                bar
            }))?;

            let label_font = self.label_font().into_font().color(&style::TEXT);
            chart.draw_series((0..names.len()).map(|i| {
                let anchor = if data.label_below(i) {
                    VPos::Top
                } else {
                    VPos::Bottom
                };
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let x = i as i32;
                Text::new(
                    data.labels[i].clone(),
                    (SegmentValue::CenterOf(x), data.height(i)),
                    label_font.pos(Pos::new(HPos::Center, anchor)),
                )
            }))?;

            root.present()?;
        }

        debug!(path = %path.display(), title = data.title, "Rendered bar chart");
        Ok(path)
    }

    fn title_font(&self) -> (&'static str, u32) {
        (style::FONT_FAMILY, self.style.title_px())
    }

    fn axis_title_font(&self) -> (&'static str, u32) {
        (style::FONT_FAMILY, self.style.axis_title_px())
    }

    fn label_font(&self) -> (&'static str, u32) {
        (style::FONT_FAMILY, self.style.label_px())
    }
}

/// Axis label for a segment centre, looked up after mapping through `index`.
fn segment_label<S: AsRef<str>>(
    value: &SegmentValue<i32>,
    names: &[S],
    index: impl Fn(i32) -> i32,
) -> String {
    match value {
        SegmentValue::CenterOf(i) => usize::try_from(index(*i))
            .ok()
            .and_then(|i| names.get(i))
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("charts").join("run");

        let renderer = ChartRenderer::new(&nested, ChartStyle::new(100)).unwrap();

        assert!(nested.is_dir());
        assert_eq!(renderer.output_dir(), nested.as_path());
    }

    #[test]
    fn segment_labels_only_at_centres() {
        let names = ["a", "b", "c"];

        assert_eq!(segment_label(&SegmentValue::CenterOf(1), &names, |i| i), "b");
        assert_eq!(segment_label(&SegmentValue::CenterOf(0), &names, |i| 2 - i), "c");
        assert_eq!(segment_label(&SegmentValue::CenterOf(3), &names, |i| i), "");
        assert_eq!(segment_label(&SegmentValue::Exact(1), &names, |i| i), "");
        assert_eq!(segment_label(&SegmentValue::<i32>::Last, &names, |i| i), "");
    }
}
