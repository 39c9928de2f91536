use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::engine::Theme;

/// Game-prediction dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "predictions-dashboard", version, about)]
pub struct Config {
    /// Prediction data: a JSON file path or an http(s) URL serving a JSON array
    #[arg(long, env = "GAMES_SOURCE", default_value = "outputs/value_today.json")]
    pub data_source: String,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Initial dashboard appearance
    #[arg(long, env = "DASHBOARD_THEME", value_enum, default_value = "dark")]
    pub theme: Theme,

    /// Timeout for fetching remote prediction data, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,
}

/// Where the prediction data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceSpec {
    Http(Url),
    File(PathBuf),
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data_source.trim().is_empty() {
            anyhow::bail!("data_source must not be empty");
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be positive");
        }
        self.source_spec()?;
        Ok(())
    }

    /// Anything that looks like a URL must parse as http(s); the rest is a path.
    pub fn source_spec(&self) -> anyhow::Result<DataSourceSpec> {
        let raw = self.data_source.trim();
        if raw.contains("://") {
            let url = Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("invalid data_source URL '{}': {}", raw, e))?;
            match url.scheme() {
                "http" | "https" => Ok(DataSourceSpec::Http(url)),
                other => anyhow::bail!("unsupported data_source scheme '{}'", other),
            }
        } else {
            Ok(DataSourceSpec::File(PathBuf::from(raw)))
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
