use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisConfig, Config, DataOverrides, DataSources, InjuryModelConfig, LoggingConfig,
    PlanGeneratorConfig, ServerConfig,
};

/// Prefix for environment overrides, e.g. `PITCHSIDE__SERVER__ADDR=0.0.0.0:8080`.
const ENV_PREFIX: &str = "PITCHSIDE";

/// Loads the application configuration from a TOML file plus environment overrides.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// layers any `PITCHSIDE__*` environment variables on top, deserializes the result into our
/// strongly-typed `Config` struct and validates it.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let data = &config.data;
    for (name, path) in [
        ("data.calendar", &data.calendar),
        ("data.gps", &data.gps),
        ("data.wellness", &data.wellness),
        ("data.roster", &data.roster),
        ("injury_model.path", &config.injury_model.path),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!("{name} must not be empty")));
        }
    }

    let plan = &config.plan_generator;
    if plan.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "plan_generator.model must not be empty".to_string(),
        ));
    }
    if plan.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "plan_generator.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.level must not be empty".to_string(),
        ));
    }

    Ok(())
}
