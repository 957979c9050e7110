//! Chart rendering for the sentiment report.
//!
//! [`prep`] turns metrics results into plain plotting data and is where all
//! the numbers are decided. [`ChartRenderer`] only draws that data to PNG.

pub mod error;
pub mod prep;
pub mod renderer;
pub mod style;

pub use error::ChartError;
pub use prep::{
    BarChartData, HeatmapCell, ScatterPoint, TimeSeriesData, TimeSeriesPoint,
};
pub use renderer::ChartRenderer;
pub use style::ChartStyle;
