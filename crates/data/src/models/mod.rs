//! Record models for the sentiment analysis pipeline.
//!
//! Numeric trade fields are `Option<f64>`: `None` marks a cell that was
//! empty or could not be parsed.

pub mod merged;
pub mod sentiment;
pub mod trade;

pub use merged::MergedRecord;
pub use sentiment::SentimentRecord;
pub use trade::TradeRecord;
