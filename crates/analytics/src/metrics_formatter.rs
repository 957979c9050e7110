#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

use crate::metrics::TradingMetrics;

const HEAVY_RULE: &str = "═══════════════════════════════════════════════════════════════\n";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────────────────\n";

pub struct MetricsFormatter;

impl MetricsFormatter {
    /// Record counts of the two inputs and the merged table.
    #[must_use]
    pub fn format_dataset(trades: usize, sentiment_days: usize, merged: usize) -> String {
        let mut output = String::new();

        output.push_str("Dataset\n");
        output.push_str(LIGHT_RULE);
        output.push_str(&format!("Trade Records:         {}\n", trades));
        output.push_str(&format!("Sentiment Records:     {}\n", sentiment_days));
        output.push_str(&format!("Merged Records:        {}\n", merged));
        output.push('\n');

        output
    }

    #[must_use]
    pub fn format(metrics: &TradingMetrics) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(HEAVY_RULE);
        output.push_str("                 OVERALL TRADING PERFORMANCE                   \n");
        output.push_str(HEAVY_RULE);
        output.push('\n');

        output.push_str("Trade Statistics\n");
        output.push_str(LIGHT_RULE);
        output.push_str(&format!("Total Trades:          {}\n", metrics.total_trades));
        output.push_str(&format!(
            "Profitable Trades:     {}\n",
            metrics.profitable_trades
        ));
        output.push_str(&format!("Losing Trades:         {}\n", metrics.losing_trades));

        if metrics.total_trades > 0 {
            output.push_str(&format!(
                "Win Rate:              {:.2}%\n",
                metrics.win_rate * 100.0
            ));
        } else {
            output.push_str("Win Rate:              N/A (no trades)\n");
        }
        output.push('\n');

        output.push_str("Profit and Loss\n");
        output.push_str(LIGHT_RULE);
        output.push_str(&format!(
            "Total Profit:          ${:.2}\n",
            metrics.total_profit
        ));
        output.push_str(&format!(
            "Avg Profit per Trade:  ${:.2}\n",
            metrics.avg_profit_per_trade
        ));
        output.push_str(&format!("Max Profit:            ${:.2}\n", metrics.max_profit));
        output.push_str(&format!("Max Loss:              ${:.2}\n", metrics.max_loss));
        output.push_str(&format!(
            "Profit Factor:         {:.2}\n",
            metrics.profit_factor
        ));

        output.push('\n');
        output.push_str(HEAVY_RULE);

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::trading_metrics;
    use chrono::NaiveDate;
    use fear_greed_core::Side;
    use fear_greed_data::TradeRecord;

    fn trade(pnl: f64) -> TradeRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TradeRecord::new(ts, "acct", Side::Sell, Some(pnl))
    }

    #[test]
    fn format_contains_headline_figures() {
        let metrics = trading_metrics(&[trade(10.0), trade(-5.0), trade(3.0)]);

        let text = MetricsFormatter::format(&metrics);

        assert!(text.contains("Total Trades:          3"));
        assert!(text.contains("Win Rate:              66.67%"));
        assert!(text.contains("Total Profit:          $8.00"));
        assert!(text.contains("Profit Factor:         2.60"));
        assert!(text.contains("Max Loss:              $-5.00"));
    }

    #[test]
    fn format_handles_empty_and_infinite_values() {
        let empty = MetricsFormatter::format(&TradingMetrics::empty());
        assert!(empty.contains("N/A (no trades)"));
        assert!(empty.contains("Avg Profit per Trade:  $NaN"));

        let only_wins = MetricsFormatter::format(&trading_metrics(&[trade(4.0)]));
        assert!(only_wins.contains("Profit Factor:         inf"));
    }

    #[test]
    fn format_dataset_lists_counts() {
        let text = MetricsFormatter::format_dataset(211_224, 2644, 211_224);

        assert!(text.contains("Trade Records:         211224"));
        assert!(text.contains("Sentiment Records:     2644"));
    }
}
