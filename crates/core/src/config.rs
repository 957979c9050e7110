use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub trades_file: String,
    pub sentiment_file: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub enabled: bool,
    /// Pixel size of one figure inch; figure layouts are specified in inches.
    pub pixels_per_inch: u32,
}

impl PathsConfig {
    /// Full path of the trade-history CSV.
    #[must_use]
    pub fn trades_path(&self) -> PathBuf {
        self.data_dir.join(&self.trades_file)
    }

    /// Full path of the Fear & Greed index CSV.
    #[must_use]
    pub fn sentiment_path(&self) -> PathBuf {
        self.data_dir.join(&self.sentiment_file)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                data_dir: PathBuf::from("data"),
                trades_file: "historical_data.csv".to_string(),
                sentiment_file: "fear_greed_index.csv".to_string(),
                output_dir: PathBuf::from("output"),
            },
            charts: ChartConfig {
                enabled: true,
                pixels_per_inch: 100,
            },
        }
    }
}
