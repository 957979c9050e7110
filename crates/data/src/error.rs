use thiserror::Error;

/// Errors raised while loading or persisting tabular data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV, including a missing expected column.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: timestamp '{value}' does not match format '%d-%m-%Y %H:%M'")]
    TimestampParse { line: u64, value: String },

    #[error("line {line}: unparseable date '{value}'")]
    DateParse { line: u64, value: String },

    #[error("line {line}: epoch seconds {value} out of range")]
    InvalidEpoch { line: u64, value: i64 },

    #[error("line {line}: unknown sentiment classification '{value}'")]
    UnknownClassification { line: u64, value: String },
}
