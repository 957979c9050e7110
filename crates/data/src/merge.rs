//! Date join of trades against the Fear & Greed index.
//!
//! Trades are left-joined on calendar date. Missing sentiment is then filled
//! across the whole chronologically ordered sequence: first from the nearest
//! earlier row, then from the nearest later row for any leading gap.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::{MergedRecord, SentimentRecord, TradeRecord};

/// Left-joins trades to sentiment on calendar date and fills gaps.
///
/// The result holds every trade exactly once, ordered by trade timestamp
/// (ties keep input order). If a day has several sentiment readings, the
/// first one in input order is used.
#[must_use]
pub fn merge(trades: &[TradeRecord], sentiment: &[SentimentRecord]) -> Vec<MergedRecord> {
    let mut by_date: HashMap<NaiveDate, &SentimentRecord> = HashMap::with_capacity(sentiment.len());
    let mut duplicates = 0usize;
    for record in sentiment {
        if by_date.contains_key(&record.date) {
            duplicates += 1;
        } else {
            by_date.insert(record.date, record);
        }
    }
    if duplicates > 0 {
        warn!(
            rows = duplicates,
            "Duplicate sentiment days ignored, first reading kept"
        );
    }

    let mut merged: Vec<MergedRecord> = trades
        .iter()
        .map(|trade| {
            let reading = by_date.get(&trade.date);
            MergedRecord {
                trade: trade.clone(),
                sentiment_value: reading.and_then(|r| r.value),
                classification: reading.map(|r| r.classification),
            }
        })
        .collect();

    merged.sort_by_key(|row| row.trade.timestamp);

    let unmatched = merged.iter().filter(|row| row.is_unclassified()).count();
    if unmatched > 0 {
        info!(rows = unmatched, "Trades without same-day sentiment, filling gaps");
    }

    let mut values: Vec<Option<f64>> = merged.iter().map(|r| r.sentiment_value).collect();
    let mut labels: Vec<_> = merged.iter().map(|r| r.classification).collect();
    fill_gaps(&mut values);
    fill_gaps(&mut labels);
    for ((row, value), label) in merged.iter_mut().zip(values).zip(labels) {
        row.sentiment_value = value;
        row.classification = label;
    }

    merged
}

/// Replaces each `None` with the nearest earlier `Some`.
pub fn forward_fill<T: Clone>(values: &mut [Option<T>]) {
    let mut last: Option<T> = None;
    for slot in values.iter_mut() {
        if slot.is_some() {
            last.clone_from(slot);
        } else {
            slot.clone_from(&last);
        }
    }
}

/// Replaces each `None` with the nearest later `Some`.
pub fn backward_fill<T: Clone>(values: &mut [Option<T>]) {
    let mut next: Option<T> = None;
    for slot in values.iter_mut().rev() {
        if slot.is_some() {
            next.clone_from(slot);
        } else {
            slot.clone_from(&next);
        }
    }
}

/// Forward fill followed by backward fill.
///
/// Afterwards the slice has no `None` unless it had no `Some` at all.
pub fn fill_gaps<T: Clone>(values: &mut [Option<T>]) {
    forward_fill(values);
    backward_fill(values);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone, Utc};
    use fear_greed_core::{Classification, Side};

    fn trade_at(day: u32, hour: u32, pnl: f64) -> TradeRecord {
        let ts: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TradeRecord::new(ts, "acct", Side::Buy, Some(pnl))
    }

    fn reading(day: u32, value: f64, classification: Classification) -> SentimentRecord {
        let ts = Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
        SentimentRecord::new(ts, value, classification)
    }

    // ============================================================
    // Fill Tests
    // ============================================================

    #[test]
    fn forward_fill_copies_earlier_values() {
        let mut values = vec![None, Some(1), None, None, Some(4), None];
        forward_fill(&mut values);

        assert_eq!(values, vec![None, Some(1), Some(1), Some(1), Some(4), Some(4)]);
    }

    #[test]
    fn backward_fill_copies_later_values() {
        let mut values = vec![None, Some(1), None, Some(4), None];
        backward_fill(&mut values);

        assert_eq!(values, vec![Some(1), Some(1), Some(4), Some(4), None]);
    }

    #[test]
    fn fill_gaps_prefers_earlier_then_later() {
        let mut values = vec![None, None, Some("a"), None, Some("b"), None];
        fill_gaps(&mut values);

        assert_eq!(
            values,
            vec![Some("a"), Some("a"), Some("a"), Some("a"), Some("b"), Some("b")]
        );
    }

    #[test]
    fn fill_gaps_all_missing_stays_missing() {
        let mut values: Vec<Option<f64>> = vec![None, None];
        fill_gaps(&mut values);

        assert!(values.iter().all(Option::is_none));
    }

    // ============================================================
    // Merge Tests
    // ============================================================

    #[test]
    fn merge_joins_on_calendar_date() {
        let trades = vec![trade_at(1, 10, 5.0), trade_at(2, 23, -1.0)];
        let sentiment = vec![
            reading(1, 20.0, Classification::ExtremeFear),
            reading(2, 55.0, Classification::Neutral),
        ];

        let merged = merge(&trades, &sentiment);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].classification, Some(Classification::ExtremeFear));
        assert_eq!(merged[1].classification, Some(Classification::Neutral));
        assert_eq!(merged[1].sentiment_value, Some(55.0));
    }

    #[test]
    fn merge_keeps_every_trade_and_orders_by_time() {
        let trades = vec![trade_at(3, 9, 1.0), trade_at(1, 9, 2.0), trade_at(2, 9, 3.0)];
        let sentiment = vec![reading(2, 40.0, Classification::Fear)];

        let merged = merge(&trades, &sentiment);

        assert_eq!(merged.len(), 3);
        let pnls: Vec<_> = merged.iter().map(|m| m.closed_pnl()).collect();
        assert_eq!(pnls, vec![Some(2.0), Some(3.0), Some(1.0)]);
    }

    #[test]
    fn merge_fills_missing_value_but_keeps_same_day_label() {
        let trades = vec![trade_at(1, 9, 1.0), trade_at(2, 9, 1.0)];
        let mut blank = reading(2, 0.0, Classification::Greed);
        blank.value = None;
        let sentiment = vec![reading(1, 30.0, Classification::Fear), blank];

        let merged = merge(&trades, &sentiment);

        assert_eq!(merged[1].classification, Some(Classification::Greed));
        assert_eq!(merged[1].sentiment_value, Some(30.0));
    }

    #[test]
    fn merge_fills_leading_and_trailing_gaps() {
        let trades = vec![trade_at(1, 9, 1.0), trade_at(2, 9, 1.0), trade_at(4, 9, 1.0)];
        let sentiment = vec![reading(2, 72.0, Classification::Greed)];

        let merged = merge(&trades, &sentiment);

        assert!(merged.iter().all(|m| m.classification == Some(Classification::Greed)));
        assert!(merged.iter().all(|m| m.sentiment_value == Some(72.0)));
    }

    #[test]
    fn merge_gap_takes_nearest_earlier_reading() {
        let trades = vec![trade_at(1, 9, 1.0), trade_at(2, 9, 1.0), trade_at(3, 9, 1.0)];
        let sentiment = vec![
            reading(1, 10.0, Classification::ExtremeFear),
            reading(3, 90.0, Classification::ExtremeGreed),
        ];

        let merged = merge(&trades, &sentiment);

        assert_eq!(merged[1].classification, Some(Classification::ExtremeFear));
        assert_eq!(merged[1].sentiment_value, Some(10.0));
    }

    #[test]
    fn merge_without_sentiment_leaves_rows_unclassified() {
        let trades = vec![trade_at(1, 9, 1.0)];

        let merged = merge(&trades, &[]);

        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_unclassified());
        assert_eq!(merged[0].sentiment_value, None);
    }

    #[test]
    fn merge_uses_first_reading_for_duplicate_day() {
        let trades = vec![trade_at(1, 9, 1.0)];
        let sentiment = vec![
            reading(1, 30.0, Classification::Fear),
            reading(1, 60.0, Classification::Greed),
        ];

        let merged = merge(&trades, &sentiment);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].classification, Some(Classification::Fear));
    }
}
