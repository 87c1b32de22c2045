use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::projection::{DEFAULT_SERIES_OFFSET, DEFAULT_SERIES_POINTS};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EndpointConfig {
    pub base_url: String,
}

impl EndpointConfig {
    fn new(base_url: &str) -> Self {
        EndpointConfig {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    /// Primary combined supply and price source
    #[serde(default = "ProvidersConfig::default_coingecko")]
    pub coingecko: EndpointConfig,
    /// Secondary supply and price sources
    #[serde(default = "ProvidersConfig::default_blockchain_info")]
    pub blockchain_info: EndpointConfig,
    /// Block height source
    #[serde(default = "ProvidersConfig::default_mempool")]
    pub mempool: EndpointConfig,
}

impl ProvidersConfig {
    fn default_coingecko() -> EndpointConfig {
        EndpointConfig::new("https://api.coingecko.com")
    }

    fn default_blockchain_info() -> EndpointConfig {
        EndpointConfig::new("https://blockchain.info")
    }

    fn default_mempool() -> EndpointConfig {
        EndpointConfig::new("https://mempool.space")
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Self::default_coingecko(),
            blockchain_info: Self::default_blockchain_info(),
            mempool: Self::default_mempool(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        PollingConfig {
            interval_secs: 60,
            request_timeout_secs: 10,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub const MAX_CHART_POINTS: usize = 365;
pub const MAX_CHART_OFFSET_DAYS: u64 = 3650;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ChartConfig {
    pub points: usize,
    pub offset_days: i64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            points: DEFAULT_SERIES_POINTS,
            offset_days: DEFAULT_SERIES_OFFSET,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "btc-supply", "btc-supply")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_secs == 0 {
            bail!("polling.interval_secs must be greater than zero");
        }
        if self.polling.request_timeout_secs == 0 {
            bail!("polling.request_timeout_secs must be greater than zero");
        }
        if self.polling.request_timeout_secs >= self.polling.interval_secs {
            bail!(
                "polling.request_timeout_secs ({}) must be shorter than polling.interval_secs ({})",
                self.polling.request_timeout_secs,
                self.polling.interval_secs
            );
        }
        if !(1..=MAX_CHART_POINTS).contains(&self.chart.points) {
            bail!("chart.points must be between 1 and {MAX_CHART_POINTS}");
        }
        if self.chart.offset_days.unsigned_abs() > MAX_CHART_OFFSET_DAYS {
            bail!("chart.offset_days must be within ±{MAX_CHART_OFFSET_DAYS} days");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  coingecko:
    base_url: "http://example.com/coingecko"
  blockchain_info:
    base_url: "http://example.com/bci"
  mempool:
    base_url: "http://example.com/mempool"
polling:
  interval_secs: 30
  request_timeout_secs: 5
chart:
  points: 10
  offset_days: -2
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.coingecko.base_url,
            "http://example.com/coingecko"
        );
        assert_eq!(
            config.providers.blockchain_info.base_url,
            "http://example.com/bci"
        );
        assert_eq!(
            config.providers.mempool.base_url,
            "http://example.com/mempool"
        );
        assert_eq!(config.polling.interval(), Duration::from_secs(30));
        assert_eq!(config.polling.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.chart.points, 10);
        assert_eq!(config.chart.offset_days, -2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let yaml_str = r#"
providers:
  mempool:
    base_url: "http://localhost:8999"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.coingecko.base_url,
            "https://api.coingecko.com"
        );
        assert_eq!(
            config.providers.blockchain_info.base_url,
            "https://blockchain.info"
        );
        assert_eq!(config.providers.mempool.base_url, "http://localhost:8999");
        assert_eq!(config.polling.interval_secs, 60);
        assert_eq!(config.polling.request_timeout_secs, 10);
        assert_eq!(config.chart.points, 30);
        assert_eq!(config.chart.offset_days, -5);

        let empty: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(empty.polling.interval_secs, 60);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.polling.request_timeout_secs = 60;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be shorter"));

        config.polling.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chart_validation() {
        let mut config = AppConfig::default();
        config.chart.points = 0;
        assert!(config.validate().is_err());
        config.chart.points = MAX_CHART_POINTS;
        assert!(config.validate().is_ok());
        config.chart.points = usize::MAX;
        assert!(config.validate().is_err());

        config.chart.points = 30;
        config.chart.offset_days = i64::MIN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chart.offset_days"));
        config.chart.offset_days = -3650;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_path_reports_parse_errors() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "polling: [not, a, map]").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
