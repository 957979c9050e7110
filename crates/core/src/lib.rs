pub mod config;
pub mod config_loader;
pub mod types;

pub use config::{AppConfig, ChartConfig, PathsConfig};
pub use config_loader::ConfigLoader;
pub use types::{Classification, ParseLabelError, Side};
