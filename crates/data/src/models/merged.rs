//! Trade rows joined with that day's sentiment reading.

use chrono::NaiveDate;
use fear_greed_core::{Classification, Side};
use serde::Serialize;

use super::trade::TradeRecord;

/// A trade plus the (gap-filled) sentiment for its calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub trade: TradeRecord,
    pub sentiment_value: Option<f64>,
    pub classification: Option<Classification>,
}

impl MergedRecord {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.trade.date
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.trade.side
    }

    #[must_use]
    pub fn closed_pnl(&self) -> Option<f64> {
        self.trade.closed_pnl
    }

    #[must_use]
    pub fn size_usd(&self) -> Option<f64> {
        self.trade.size_usd
    }

    /// Returns true if no sentiment could be attached, even after gap filling.
    #[must_use]
    pub fn is_unclassified(&self) -> bool {
        self.classification.is_none()
    }
}

impl AsRef<TradeRecord> for MergedRecord {
    fn as_ref(&self) -> &TradeRecord {
        &self.trade
    }
}
