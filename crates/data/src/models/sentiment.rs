//! Fear & Greed index record model.

use chrono::{DateTime, NaiveDate, Utc};
use fear_greed_core::Classification;
use serde::Serialize;

/// One daily Fear & Greed reading.
///
/// The calendar date is derived twice: from the epoch timestamp (`date`, used
/// for joining) and from the export's own date column (`date_label`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRecord {
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub date_label: NaiveDate,
    /// Index value, 0 to 100. `None` when the export's cell was blank or unparseable.
    pub value: Option<f64>,
    pub classification: Classification,
}

impl SentimentRecord {
    /// Creates a record whose date label agrees with the timestamp.
    pub fn new(timestamp: DateTime<Utc>, value: f64, classification: Classification) -> Self {
        let date = timestamp.date_naive();
        Self {
            timestamp,
            date,
            date_label: date,
            value: Some(value),
            classification,
        }
    }

    /// Returns true if the two date derivations disagree.
    #[must_use]
    pub fn has_date_mismatch(&self) -> bool {
        self.date != self.date_label
    }
}
