//! Daily aggregates and their Pearson correlation matrix.

use chrono::NaiveDate;
use fear_greed_core::Side;
use fear_greed_data::{MergedRecord, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trading activity and sentiment for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub trade_count: usize,
    /// Sum of closed PnL, missing cells skipped.
    pub total_pnl: f64,
    /// Sum of USD size, missing cells skipped.
    pub total_volume_usd: f64,
    /// Mean sentiment value of the day's trades; NaN if none carry one.
    pub mean_sentiment: f64,
    /// Fraction of the day's trades that were BUY.
    pub buy_ratio: f64,
}

/// Groups rows by calendar date, ascending.
#[must_use]
pub fn daily_summaries(rows: &[MergedRecord]) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&MergedRecord>> = BTreeMap::new();
    for row in rows {
        by_date.entry(row.date()).or_default().push(row);
    }

    by_date
        .into_iter()
        .map(|(date, day)| {
            let trade_count = day.len();
            let total_pnl = day.iter().filter_map(|r| r.closed_pnl()).sum();
            let total_volume_usd = day.iter().filter_map(|r| r.size_usd()).sum();
            let values: Vec<f64> = day.iter().filter_map(|r| r.sentiment_value).collect();
            let buys = day.iter().filter(|r| r.side() == Side::Buy).count();

            #[allow(clippy::cast_precision_loss)]
            let mean_sentiment = if values.is_empty() {
                f64::NAN
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            #[allow(clippy::cast_precision_loss)]
            let buy_ratio = buys as f64 / trade_count as f64;

            DailySummary {
                date,
                trade_count,
                total_pnl,
                total_volume_usd,
                mean_sentiment,
                buy_ratio,
            }
        })
        .collect()
}

/// Symmetric correlation matrix over the four daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: [String; 4],
    /// `values[i][j]` is the correlation of series `i` and `j`; NaN when undefined.
    pub values: [[f64; 4]; 4],
}

impl CorrelationMatrix {
    pub const SERIES: [&'static str; 4] = [
        "daily_pnl",
        "daily_volume_usd",
        "sentiment_value",
        "buy_ratio",
    ];

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Square table labelled by series name on both axes.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(std::iter::once("").chain(self.labels.iter().map(String::as_str)));
        for (label, row) in self.labels.iter().zip(self.values.iter()) {
            table.push_row(std::iter::once(label.clone()).chain(row.iter().map(ToString::to_string)));
        }
        table
    }
}

/// Correlates daily PnL, daily USD volume, mean sentiment and buy ratio.
///
/// The diagonal is 1. Off-diagonal cells use pairwise-complete days and are
/// NaN with fewer than two such days or a constant series.
#[must_use]
pub fn sentiment_correlation(rows: &[MergedRecord]) -> CorrelationMatrix {
    let days = daily_summaries(rows);
    tracing::debug!(days = days.len(), "Correlating daily series");
    let series: [Vec<f64>; 4] = [
        days.iter().map(|d| d.total_pnl).collect(),
        days.iter().map(|d| d.total_volume_usd).collect(),
        days.iter().map(|d| d.mean_sentiment).collect(),
        days.iter().map(|d| d.buy_ratio).collect(),
    ];

    let mut values = [[f64::NAN; 4]; 4];
    for i in 0..4 {
        values[i][i] = 1.0;
        for j in (i + 1)..4 {
            let r = pearson_correlation(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: CorrelationMatrix::SERIES.map(String::from),
        values,
    }
}

/// Pearson correlation of two equally long series.
///
/// Positions where either value is not finite are dropped first.
#[must_use]
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();

    if x.len() != y.len() || pairs.len() < 2 {
        return f64::NAN;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut scale_x = 0.0;
    let mut scale_y = 0.0;

    for (xi, yi) in &pairs {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
        scale_x += xi * xi;
        scale_y += yi * yi;
    }

    // A spread at rounding-noise level relative to the values means a constant series.
    if var_x <= f64::EPSILON * scale_x || var_y <= f64::EPSILON * scale_y {
        return f64::NAN;
    }

    (covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}
