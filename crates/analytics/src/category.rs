//! Per-category aggregates in fixed classification order.
//!
//! Each function returns one entry per [`Classification::ALL`] member, so
//! chart axes and report rows line up regardless of which categories occur.

use fear_greed_core::Classification;
use fear_greed_data::{MergedRecord, SentimentRecord};
use serde::{Deserialize, Serialize};

use crate::metrics::trading_metrics;

/// Splits merged rows into one bucket per classification.
///
/// Rows left unclassified after gap filling are dropped.
#[must_use]
pub fn partition_by_category(rows: &[MergedRecord]) -> [Vec<&MergedRecord>; 5] {
    let mut buckets: [Vec<&MergedRecord>; 5] = Default::default();
    for row in rows {
        if let Some(classification) = row.classification {
            buckets[classification.index()].push(row);
        }
    }
    buckets
}

/// Number of sentiment readings per classification.
#[must_use]
pub fn sentiment_distribution(readings: &[SentimentRecord]) -> [usize; 5] {
    let mut counts = [0; 5];
    for reading in readings {
        counts[reading.classification.index()] += 1;
    }
    counts
}

/// Mean and total PnL of the trades under one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfit {
    pub classification: Classification,
    /// NaN when the category has no trades with a PnL.
    pub mean_profit: f64,
    pub total_profit: f64,
    pub trade_count: usize,
}

#[must_use]
pub fn profit_by_sentiment(rows: &[MergedRecord]) -> Vec<CategoryProfit> {
    let buckets = partition_by_category(rows);
    Classification::ALL
        .iter()
        .zip(buckets.iter())
        .map(|(&classification, bucket)| {
            let metrics = trading_metrics(bucket);
            CategoryProfit {
                classification,
                mean_profit: metrics.avg_profit_per_trade,
                total_profit: metrics.total_profit,
                trade_count: metrics.total_trades,
            }
        })
        .collect()
}

/// Win rate per classification; 0 for categories without trades.
#[must_use]
pub fn win_rate_by_sentiment(rows: &[MergedRecord]) -> [f64; 5] {
    partition_by_category(rows).map(|bucket| trading_metrics(&bucket).win_rate)
}

/// Summed USD size per classification, missing sizes skipped.
#[must_use]
pub fn volume_by_sentiment(rows: &[MergedRecord]) -> [f64; 5] {
    partition_by_category(rows).map(|bucket| bucket.iter().filter_map(|r| r.size_usd()).sum())
}
