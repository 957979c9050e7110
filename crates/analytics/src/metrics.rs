//! Trade performance metrics and keyed breakdowns.
//!
//! Missing PnL cells count toward `total_trades` and `losing_trades` but are
//! skipped by the sum, mean and extrema.

use fear_greed_core::Classification;
use fear_greed_data::{MergedRecord, Table, TradeRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Aggregate performance of a set of trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingMetrics {
    /// Number of trades in the set.
    pub total_trades: usize,
    /// Trades with PnL strictly above zero.
    pub profitable_trades: usize,
    /// All remaining trades, break-even included.
    pub losing_trades: usize,
    /// profitable / total, 0 for an empty set.
    pub win_rate: f64,
    pub total_profit: f64,
    /// NaN when no trade has a PnL.
    pub avg_profit_per_trade: f64,
    /// NaN when no trade has a PnL.
    pub max_profit: f64,
    /// Minimum PnL. NaN when no trade has a PnL.
    pub max_loss: f64,
    /// Gross profit over absolute gross loss.
    ///
    /// With no losses this is `+inf` if there was any profit, else 0.
    pub profit_factor: f64,
}

impl TradingMetrics {
    /// Column names in CSV order.
    pub const FIELD_NAMES: [&'static str; 9] = [
        "total_trades",
        "profitable_trades",
        "losing_trades",
        "win_rate",
        "total_profit",
        "avg_profit_per_trade",
        "max_profit",
        "max_loss",
        "profit_factor",
    ];

    /// Metrics of an empty trade set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_trades: 0,
            profitable_trades: 0,
            losing_trades: 0,
            win_rate: 0.0,
            total_profit: 0.0,
            avg_profit_per_trade: f64::NAN,
            max_profit: f64::NAN,
            max_loss: f64::NAN,
            profit_factor: 0.0,
        }
    }

    /// Field values rendered for a CSV row, in [`Self::FIELD_NAMES`] order.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.total_trades.to_string(),
            self.profitable_trades.to_string(),
            self.losing_trades.to_string(),
            self.win_rate.to_string(),
            self.total_profit.to_string(),
            self.avg_profit_per_trade.to_string(),
            self.max_profit.to_string(),
            self.max_loss.to_string(),
            self.profit_factor.to_string(),
        ]
    }
}

/// Computes [`TradingMetrics`] over any slice of trade-bearing rows.
#[must_use]
pub fn trading_metrics<T: AsRef<TradeRecord>>(rows: &[T]) -> TradingMetrics {
    if rows.is_empty() {
        return TradingMetrics::empty();
    }

    let total_trades = rows.len();
    let pnls: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.as_ref().closed_pnl)
        .collect();

    let profitable_trades = pnls.iter().filter(|&&p| p > 0.0).count();
    let losing_trades = total_trades - profitable_trades;

    #[allow(clippy::cast_precision_loss)]
    let win_rate = profitable_trades as f64 / total_trades as f64;

    let total_profit: f64 = pnls.iter().sum();

    #[allow(clippy::cast_precision_loss)]
    let avg_profit_per_trade = if pnls.is_empty() {
        f64::NAN
    } else {
        total_profit / pnls.len() as f64
    };

    let max_profit = pnls.iter().copied().reduce(f64::max).unwrap_or(f64::NAN);
    let max_loss = pnls.iter().copied().reduce(f64::min).unwrap_or(f64::NAN);

    let gross_profit: f64 = pnls.iter().filter(|&&p| p > 0.0).sum();
    let gross_loss: f64 = pnls.iter().filter(|&&p| p < 0.0).sum::<f64>().abs();
    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    TradingMetrics {
        total_trades,
        profitable_trades,
        losing_trades,
        win_rate,
        total_profit,
        avg_profit_per_trade,
        max_profit,
        max_loss,
        profit_factor,
    }
}

/// Partitions rows by `key` and computes [`TradingMetrics`] per partition.
///
/// Keys appear in order of first occurrence. Rows for which `key` returns
/// `None` are left out.
pub fn performance_by<T, K, F>(rows: &[T], key: F) -> Vec<(K, TradingMetrics)>
where
    T: AsRef<TradeRecord>,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> Option<K>,
{
    let mut order: Vec<K> = Vec::new();
    let mut groups: HashMap<K, Vec<&T>> = HashMap::new();

    for row in rows {
        let Some(k) = key(row) else {
            continue;
        };
        groups
            .entry(k.clone())
            .or_insert_with(|| {
                order.push(k);
                Vec::new()
            })
            .push(row);
    }

    tracing::debug!(rows = rows.len(), groups = order.len(), "Partitioned trades");

    order
        .into_iter()
        .map(|k| {
            let group = groups.remove(&k).unwrap_or_default();
            let metrics = trading_metrics(&group);
            (k, metrics)
        })
        .collect()
}

/// Metrics per sentiment classification, in Extreme Fear to Extreme Greed order.
///
/// Only classifications with at least one trade are present.
#[must_use]
pub fn performance_by_sentiment(rows: &[MergedRecord]) -> Vec<(Classification, TradingMetrics)> {
    let mut result = performance_by(rows, |r| r.classification);
    result.sort_by_key(|(c, _)| *c);
    result
}

/// Metrics per trader account, in order of first appearance.
#[must_use]
pub fn performance_by_account<T: AsRef<TradeRecord>>(rows: &[T]) -> Vec<(String, TradingMetrics)> {
    performance_by(rows, |r| Some(r.as_ref().account.clone()))
}

/// Renders keyed metrics as a table whose first column is `key_name`.
#[must_use]
pub fn performance_table<K: Display>(key_name: &str, rows: &[(K, TradingMetrics)]) -> Table {
    let mut table = Table::new(std::iter::once(key_name).chain(TradingMetrics::FIELD_NAMES));
    for (key, metrics) in rows {
        table.push_row(std::iter::once(key.to_string()).chain(metrics.to_row()));
    }
    table
}
