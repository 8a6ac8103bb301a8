use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section carries defaults, so an empty file (or no file at all)
/// produces a working setup that tracks `^VIX` from Yahoo Finance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub data_source: DataSourceConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection details for the upstream daily price provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// The index symbol to track (e.g., "^VIX").
    pub symbol: String,
    /// Base URL of the chart API, without a trailing slash.
    pub base_url: String,
    /// How many calendar days of history to fetch on each ingest.
    pub lookback_days: u32,
    /// Per-request timeout for the HTTP client.
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Window sizes for the derived metrics and the default history length.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub short_window: usize,
    pub long_window: usize,
    /// Full window required before rolling mean/std and z-score are produced.
    pub stats_window: usize,
    /// Number of rows returned by history endpoints when `days` is omitted.
    pub history_days: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

// --- Default Implementations ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            symbol: "^VIX".to_string(),
            base_url: "https://query1.finance.yahoo.com".to_string(),
            lookback_days: 365,
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) volscope/0.1".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            stats_window: 30,
            history_days: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
