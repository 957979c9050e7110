//! Trade-history record model.
//!
//! One row per executed fill from the exchange export.

use chrono::{NaiveDate, NaiveDateTime};
use fear_greed_core::Side;
use serde::Serialize;

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    /// Execution time as exported (IST wall clock, no zone attached)
    pub timestamp: NaiveDateTime,
    /// Calendar date of `timestamp`, the join key against sentiment data
    pub date: NaiveDate,
    /// Trader account identifier
    pub account: String,
    /// BUY or SELL
    pub side: Side,
    pub execution_price: Option<f64>,
    /// Size in base-asset units
    pub size_tokens: Option<f64>,
    /// Size in USD
    pub size_usd: Option<f64>,
    /// Realized profit or loss in USD
    pub closed_pnl: Option<f64>,
    pub fee: Option<f64>,
    /// True when `closed_pnl >= 0`. Missing PnL is not a profit.
    pub is_profit: bool,
}

impl TradeRecord {
    /// Creates a trade with the derived date and profit flag filled in.
    ///
    /// Price, token size, USD size and fee start out missing.
    pub fn new(
        timestamp: NaiveDateTime,
        account: impl Into<String>,
        side: Side,
        closed_pnl: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            account: account.into(),
            side,
            execution_price: None,
            size_tokens: None,
            size_usd: None,
            closed_pnl,
            fee: None,
            is_profit: profit_flag(closed_pnl),
        }
    }

    /// Sets the USD size.
    #[must_use]
    pub fn with_size_usd(mut self, size_usd: f64) -> Self {
        self.size_usd = Some(size_usd);
        self
    }

    /// Sets execution price, token size and fee.
    #[must_use]
    pub fn with_execution(mut self, price: f64, size_tokens: f64, fee: f64) -> Self {
        self.execution_price = Some(price);
        self.size_tokens = Some(size_tokens);
        self.fee = Some(fee);
        self
    }

    /// Binary profit flag: 1 if `closed_pnl >= 0`, else 0.
    #[must_use]
    pub fn profit_flag(&self) -> u8 {
        u8::from(self.is_profit)
    }

    /// Returns true if any numeric cell is missing.
    #[must_use]
    pub fn has_missing_numeric(&self) -> bool {
        self.execution_price.is_none()
            || self.size_tokens.is_none()
            || self.size_usd.is_none()
            || self.closed_pnl.is_none()
            || self.fee.is_none()
    }
}

impl AsRef<TradeRecord> for TradeRecord {
    fn as_ref(&self) -> &TradeRecord {
        self
    }
}

pub(crate) fn profit_flag(closed_pnl: Option<f64>) -> bool {
    closed_pnl.is_some_and(|pnl| pnl >= 0.0)
}
