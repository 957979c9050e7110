use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Environment variable prefix. Nested keys use `__`, e.g. `FEAR_GREED_PATHS__OUTPUT_DIR`.
    pub const ENV_PREFIX: &'static str = "FEAR_GREED_";

    /// Loads configuration by merging built-in defaults, the TOML file and environment variables.
    ///
    /// A missing TOML file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment override cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        }

        let config: AppConfig = Self::figment(path).extract()?;

        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.paths.trades_file, "historical_data.csv");
        assert!(config.charts.enabled);
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[paths]\noutput_dir = \"reports\"\n\n[charts]\nenabled = false"
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();

        assert_eq!(config.paths.output_dir, std::path::PathBuf::from("reports"));
        assert_eq!(config.paths.sentiment_file, "fear_greed_index.csv");
        assert!(!config.charts.enabled);
        assert_eq!(config.charts.pixels_per_inch, 100);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        std::fs::write(&path, "[charts]\nenabled = \"sometimes\"\n").unwrap();

        assert!(ConfigLoader::load(&path).is_err());
    }
}
