//! Driver for the Fear & Greed trading sentiment report.

pub mod pipeline;

pub use pipeline::{run_pipeline, run_summary, write_reports, PipelineSummary, ReportFiles};
