//! CSV loaders for the trade history and the Fear & Greed index.
//!
//! Numeric columns are parsed leniently: an unparseable cell becomes `None`
//! instead of failing the load. An unrecognised trade side becomes
//! [`Side::Other`]. Timestamps are strict.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fear_greed_core::{Classification, Side};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::models::{trade::profit_flag, SentimentRecord, TradeRecord};

/// Format of the `Timestamp IST` column, e.g. `02-12-2024 22:50`.
pub const TRADE_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Accepted layouts of the sentiment export's `date` column.
const SENTIMENT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

#[derive(Debug, Deserialize)]
struct RawTradeRow {
    #[serde(rename = "Account")]
    account: String,
    #[serde(rename = "Side")]
    side: String,
    #[serde(rename = "Timestamp IST")]
    timestamp_ist: String,
    #[serde(rename = "Execution Price", deserialize_with = "csv::invalid_option")]
    execution_price: Option<f64>,
    #[serde(rename = "Size Tokens", deserialize_with = "csv::invalid_option")]
    size_tokens: Option<f64>,
    #[serde(rename = "Size USD", deserialize_with = "csv::invalid_option")]
    size_usd: Option<f64>,
    #[serde(rename = "Closed PnL", deserialize_with = "csv::invalid_option")]
    closed_pnl: Option<f64>,
    #[serde(rename = "Fee", deserialize_with = "csv::invalid_option")]
    fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSentimentRow {
    timestamp: i64,
    #[serde(deserialize_with = "csv::invalid_option")]
    value: Option<f64>,
    classification: String,
    date: String,
}

/// Loads the trade history CSV.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be opened
/// - An expected column is missing
/// - A `Timestamp IST` cell does not match [`TRADE_TIMESTAMP_FORMAT`]
pub fn load_trades(path: impl AsRef<Path>) -> Result<Vec<TradeRecord>, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let trades = read_trades(file)?;
    info!(path = %path.display(), rows = trades.len(), "Loaded trade history");
    Ok(trades)
}

/// Parses trade history CSV from any reader. See [`load_trades`].
///
/// # Errors
/// Same conditions as [`load_trades`], minus file access.
pub fn read_trades<R: Read>(reader: R) -> Result<Vec<TradeRecord>, DataError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut trades = Vec::new();
    let mut coerced_rows = 0usize;
    let mut other_sides = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let raw: RawTradeRow = record.deserialize(Some(&headers))?;

        let timestamp = NaiveDateTime::parse_from_str(raw.timestamp_ist.trim(), TRADE_TIMESTAMP_FORMAT)
            .map_err(|_| DataError::TimestampParse {
                line,
                value: raw.timestamp_ist.clone(),
            })?;
        let side = Side::from_label(&raw.side);
        if side == Side::Other {
            other_sides += 1;
            debug!(line, side = %raw.side, "Unrecognised trade side");
        }

        let trade = TradeRecord {
            timestamp,
            date: timestamp.date(),
            account: raw.account,
            side,
            execution_price: raw.execution_price,
            size_tokens: raw.size_tokens,
            size_usd: raw.size_usd,
            closed_pnl: raw.closed_pnl,
            fee: raw.fee,
            is_profit: profit_flag(raw.closed_pnl),
        };

        if trade.has_missing_numeric() {
            coerced_rows += 1;
            debug!(line, "Trade row has missing or unparseable numeric cells");
        }
        trades.push(trade);
    }

    if coerced_rows > 0 {
        warn!(
            rows = coerced_rows,
            "Trade rows with numeric cells coerced to missing"
        );
    }
    if other_sides > 0 {
        warn!(rows = other_sides, "Trade rows with a side other than BUY or SELL");
    }

    Ok(trades)
}

/// Loads the Fear & Greed index CSV.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be opened
/// - An expected column is missing or `timestamp` is not an integer
/// - The epoch timestamp is out of range
/// - The `date` column cannot be parsed
/// - A classification is not one of the five known labels
pub fn load_sentiment(path: impl AsRef<Path>) -> Result<Vec<SentimentRecord>, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = read_sentiment(file)?;
    info!(path = %path.display(), rows = records.len(), "Loaded Fear & Greed index");
    Ok(records)
}

/// Parses Fear & Greed CSV from any reader. See [`load_sentiment`].
///
/// # Errors
/// Same conditions as [`load_sentiment`], minus file access.
pub fn read_sentiment<R: Read>(reader: R) -> Result<Vec<SentimentRecord>, DataError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    let mut mismatched = 0usize;
    let mut missing_values = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let raw: RawSentimentRow = record.deserialize(Some(&headers))?;

        let timestamp = DateTime::from_timestamp(raw.timestamp, 0).ok_or(DataError::InvalidEpoch {
            line,
            value: raw.timestamp,
        })?;
        let date_label = parse_date_label(&raw.date).ok_or_else(|| DataError::DateParse {
            line,
            value: raw.date.clone(),
        })?;
        let classification: Classification =
            raw.classification
                .parse()
                .map_err(|_| DataError::UnknownClassification {
                    line,
                    value: raw.classification.clone(),
                })?;

        let sentiment = SentimentRecord {
            timestamp,
            date: timestamp.date_naive(),
            date_label,
            value: raw.value,
            classification,
        };

        if sentiment.has_date_mismatch() {
            mismatched += 1;
        }
        if sentiment.value.is_none() {
            missing_values += 1;
        }
        records.push(sentiment);
    }

    if mismatched > 0 {
        warn!(
            rows = mismatched,
            "Sentiment rows whose date column disagrees with the timestamp date"
        );
    }
    if missing_values > 0 {
        warn!(
            rows = missing_values,
            "Sentiment rows with missing or unparseable value"
        );
    }

    Ok(records)
}

fn parse_date_label(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    SENTIMENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
