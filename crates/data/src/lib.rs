//! Data loading and storage for the Fear & Greed trading analysis.
//!
//! This crate provides:
//! - Record models for trades, sentiment readings and merged rows
//! - CSV loaders with lenient numeric coercion and strict timestamp parsing
//! - The date join with forward/backward gap filling
//! - A `TableSink` abstraction with a CSV-on-disk implementation

pub mod csv_storage;
pub mod error;
pub mod loader;
pub mod merge;
pub mod models;

// Re-export commonly used types
pub use csv_storage::{CsvStorage, InMemorySink, Table, TableSink};
pub use error::DataError;
pub use loader::{load_sentiment, load_trades, read_sentiment, read_trades, TRADE_TIMESTAMP_FORMAT};
pub use merge::{backward_fill, fill_gaps, forward_fill, merge};
pub use models::{MergedRecord, SentimentRecord, TradeRecord};
