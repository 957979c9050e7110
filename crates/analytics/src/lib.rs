//! Metrics engine for trade performance against market sentiment.
//!
//! Every function here is pure: it takes in-memory records and returns a
//! result value. Conversion into [`fear_greed_data::Table`] happens through
//! each result's `to_table` method, so persistence stays with the caller.

pub mod category;
pub mod correlation;
pub mod metrics;
pub mod metrics_formatter;
pub mod side_distribution;
pub mod transitions;

pub use category::{
    partition_by_category, profit_by_sentiment, sentiment_distribution, volume_by_sentiment,
    win_rate_by_sentiment, CategoryProfit,
};
pub use correlation::{
    daily_summaries, pearson_correlation, sentiment_correlation, CorrelationMatrix, DailySummary,
};
pub use metrics::{
    performance_by, performance_by_account, performance_by_sentiment, performance_table,
    trading_metrics, TradingMetrics,
};
pub use metrics_formatter::MetricsFormatter;
pub use side_distribution::{side_distribution, SideDistribution};
pub use transitions::{transition_matrix, TransitionMatrix};
