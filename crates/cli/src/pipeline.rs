//! The fixed load, merge, report and chart sequence.
//!
//! Every stage fails fast: the first error aborts the run with context
//! naming the stage.

use std::path::PathBuf;

use anyhow::Context;
use fear_greed_analytics::{
    daily_summaries, performance_by_account, performance_by_sentiment, performance_table,
    profit_by_sentiment, sentiment_correlation, sentiment_distribution, side_distribution,
    trading_metrics, transition_matrix, volume_by_sentiment, win_rate_by_sentiment,
    CorrelationMatrix, MetricsFormatter, TradingMetrics,
};
use fear_greed_charts::{ChartError, ChartRenderer, ChartStyle};
use fear_greed_core::AppConfig;
use fear_greed_data::{
    load_sentiment, load_trades, merge, CsvStorage, MergedRecord, SentimentRecord, TableSink,
    TradeRecord,
};

/// File names of the CSV reports, in writing order.
pub struct ReportFiles;

impl ReportFiles {
    pub const SENTIMENT_PERFORMANCE: &'static str = "sentiment_performance.csv";
    pub const SENTIMENT_TRANSITIONS: &'static str = "sentiment_transitions.csv";
    pub const ACCOUNT_PERFORMANCE: &'static str = "account_performance.csv";
    pub const SIDE_BY_SENTIMENT: &'static str = "side_by_sentiment.csv";
    pub const SIDE_BY_SENTIMENT_PCT: &'static str = "side_by_sentiment_pct.csv";
    pub const SENTIMENT_CORRELATIONS: &'static str = "sentiment_correlations.csv";

    pub const ALL: [&'static str; 6] = [
        Self::SENTIMENT_PERFORMANCE,
        Self::SENTIMENT_TRANSITIONS,
        Self::ACCOUNT_PERFORMANCE,
        Self::SIDE_BY_SENTIMENT,
        Self::SIDE_BY_SENTIMENT_PCT,
        Self::SENTIMENT_CORRELATIONS,
    ];
}

/// What a completed run produced.
#[derive(Debug)]
pub struct PipelineSummary {
    pub trade_count: usize,
    pub sentiment_count: usize,
    pub merged_count: usize,
    /// Metrics over the whole trade history.
    pub overall: TradingMetrics,
    pub reports: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

struct Dataset {
    trades: Vec<TradeRecord>,
    sentiment: Vec<SentimentRecord>,
    merged: Vec<MergedRecord>,
}

fn load_dataset(config: &AppConfig) -> anyhow::Result<Dataset> {
    let trades_path = config.paths.trades_path();
    let sentiment_path = config.paths.sentiment_path();

    let trades = load_trades(&trades_path)
        .with_context(|| format!("Failed to load trades from {}", trades_path.display()))?;
    let sentiment = load_sentiment(&sentiment_path).with_context(|| {
        format!(
            "Failed to load sentiment index from {}",
            sentiment_path.display()
        )
    })?;
    let merged = merge(&trades, &sentiment);

    Ok(Dataset {
        trades,
        sentiment,
        merged,
    })
}

/// Loads and merges both sources, prints dataset sizes and overall metrics.
///
/// Writes nothing.
///
/// # Errors
/// Returns error if either source cannot be loaded
pub fn run_summary(config: &AppConfig) -> anyhow::Result<TradingMetrics> {
    let data = load_dataset(config)?;
    let overall = trading_metrics(&data.trades);

    print!(
        "{}",
        MetricsFormatter::format_dataset(
            data.trades.len(),
            data.sentiment.len(),
            data.merged.len()
        )
    );
    println!("{}", MetricsFormatter::format(&overall));

    Ok(overall)
}

/// Runs the full report: load, merge, overall metrics, CSV reports, charts.
///
/// # Errors
/// Returns error on the first stage that fails
pub fn run_pipeline(config: &AppConfig, render_charts: bool) -> anyhow::Result<PipelineSummary> {
    let output_dir = &config.paths.output_dir;
    let mut storage = CsvStorage::new(output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output_dir.display()
        )
    })?;

    println!("Loading and preprocessing data...");
    let data = load_dataset(config)?;
    tracing::info!(
        trades = data.trades.len(),
        sentiment = data.sentiment.len(),
        merged = data.merged.len(),
        "Dataset loaded"
    );
    print!(
        "{}",
        MetricsFormatter::format_dataset(
            data.trades.len(),
            data.sentiment.len(),
            data.merged.len()
        )
    );

    println!("Calculating overall trading metrics...");
    let overall = trading_metrics(&data.trades);
    println!("{}", MetricsFormatter::format(&overall));

    let correlation = sentiment_correlation(&data.merged);
    let reports = write_reports(
        &mut storage,
        &data.trades,
        &data.sentiment,
        &data.merged,
        &correlation,
    )?;

    let charts = if render_charts {
        println!("\nGenerating visualizations...");
        let renderer = ChartRenderer::new(output_dir, ChartStyle::from(&config.charts))
            .context("Failed to prepare chart output")?;
        render_all_charts(&renderer, &data.sentiment, &data.merged, &correlation)?
    } else {
        tracing::info!("Chart rendering skipped");
        Vec::new()
    };

    println!(
        "\nAnalysis complete! Results are saved in the '{}' directory.",
        output_dir.display()
    );

    Ok(PipelineSummary {
        trade_count: data.trades.len(),
        sentiment_count: data.sentiment.len(),
        merged_count: data.merged.len(),
        overall,
        reports,
        charts,
    })
}

/// Computes every report table and hands it to `sink`, in a fixed order.
///
/// Account performance is taken over the raw trades; every other breakdown
/// uses the merged rows.
///
/// # Errors
/// Returns error if the sink fails to store a table
pub fn write_reports(
    sink: &mut impl TableSink,
    trades: &[TradeRecord],
    sentiment: &[SentimentRecord],
    merged: &[MergedRecord],
    correlation: &CorrelationMatrix,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(ReportFiles::ALL.len());
    let mut store = |name: &str, table| -> anyhow::Result<()> {
        let path = sink
            .write_table(name, &table)
            .with_context(|| format!("Failed to write report {name}"))?;
        println!("Saved {}", path.display());
        written.push(path);
        Ok(())
    };

    println!("\nAnalyzing performance by sentiment...");
    store(
        ReportFiles::SENTIMENT_PERFORMANCE,
        performance_table("classification", &performance_by_sentiment(merged)),
    )?;

    println!("\nCalculating sentiment transition probabilities...");
    store(
        ReportFiles::SENTIMENT_TRANSITIONS,
        transition_matrix(sentiment).to_table(),
    )?;

    println!("\nAnalyzing performance by account...");
    store(
        ReportFiles::ACCOUNT_PERFORMANCE,
        performance_table("account", &performance_by_account(trades)),
    )?;

    println!("\nAnalyzing trading side distribution by sentiment...");
    let sides = side_distribution(merged);
    store(ReportFiles::SIDE_BY_SENTIMENT, sides.counts_table())?;
    store(ReportFiles::SIDE_BY_SENTIMENT_PCT, sides.percentages_table())?;

    println!("\nCalculating correlation between sentiment and trading metrics...");
    store(ReportFiles::SENTIMENT_CORRELATIONS, correlation.to_table())?;

    Ok(written)
}

fn render_all_charts(
    renderer: &ChartRenderer,
    sentiment: &[SentimentRecord],
    merged: &[MergedRecord],
    correlation: &CorrelationMatrix,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut charts = Vec::new();
    let mut saved = |rendered: Result<PathBuf, ChartError>| -> anyhow::Result<()> {
        let path = rendered.context("Failed to render chart")?;
        println!("Saved {}", path.display());
        charts.push(path);
        Ok(())
    };

    saved(renderer.sentiment_distribution(sentiment_distribution(sentiment)))?;
    saved(renderer.profit_by_sentiment(&profit_by_sentiment(merged)))?;
    saved(renderer.win_rate_by_sentiment(win_rate_by_sentiment(merged)))?;
    saved(renderer.sentiment_time_series(&daily_summaries(merged)))?;
    saved(renderer.trade_size_vs_sentiment(merged))?;
    saved(renderer.correlation_heatmap(correlation))?;
    saved(renderer.volume_by_sentiment(volume_by_sentiment(merged)))?;

    Ok(charts)
}
