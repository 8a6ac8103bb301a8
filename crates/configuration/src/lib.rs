use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisConfig, DataSourceConfig, LoggingConfig, ServerConfig, Settings};

/// Environment variables with this prefix override file values,
/// e.g. `VOLSCOPE__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "VOLSCOPE";

/// Loads the application configuration.
///
/// Sources are layered in order: built-in defaults, the TOML file at `path`
/// (optional, skipped when missing), then `VOLSCOPE__*` environment variables.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let settings = build(builder)?;
    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(settings)
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }
    if settings.data_source.lookback_days == 0 {
        return Err(ConfigError::ValidationError(
            "data_source.lookback_days must be at least 1".to_string(),
        ));
    }
    let analysis = &settings.analysis;
    if analysis.short_window == 0 || analysis.long_window == 0 {
        return Err(ConfigError::ValidationError(
            "moving average windows must be at least 1".to_string(),
        ));
    }
    // Sample standard deviation needs two points.
    if analysis.stats_window < 2 {
        return Err(ConfigError::ValidationError(
            "analysis.stats_window must be at least 2".to_string(),
        ));
    }
    Ok(())
}
