use core_types::DrillAllowList;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSources,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub injury_model: InjuryModelConfig,
    #[serde(default)]
    pub plan_generator: PlanGeneratorConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the four flat files the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataSources {
    pub calendar: PathBuf,
    /// The GPS session export.
    pub gps: PathBuf,
    pub wellness: PathBuf,
    pub roster: PathBuf,
}

/// Settings for the aggregation engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Drills to keep in team reports. Empty keeps every drill, which also
    /// keeps ad-hoc or mislabeled segments.
    #[serde(default)]
    pub drill_allow_list: DrillAllowList,
}

/// Where the pre-trained injury classifier lives.
#[derive(Debug, Clone, Deserialize)]
pub struct InjuryModelConfig {
    pub path: PathBuf,
}

/// Settings for the language-model client that drafts personalized plans.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanGeneratorConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for PlanGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when it is set.
    pub level: String,
    /// Directory for the daily rolling log file. No file is written when unset.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "pitchside.log".to_string(),
        }
    }
}

/// Command-line overrides for the data file locations.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Debug, Clone, Default)]
pub struct DataOverrides {
    /// Path to the calendar CSV.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub calendar: Option<PathBuf>,
    /// Path to the GPS sessions CSV.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub gps: Option<PathBuf>,
    /// Path to the wellness CSV.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub wellness: Option<PathBuf>,
    /// Path to the roster CSV.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub roster: Option<PathBuf>,
}

impl DataSources {
    pub fn apply(&mut self, overrides: DataOverrides) {
        if let Some(path) = overrides.calendar {
            self.calendar = path;
        }
        if let Some(path) = overrides.gps {
            self.gps = path;
        }
        if let Some(path) = overrides.wellness {
            self.wellness = path;
        }
        if let Some(path) = overrides.roster {
            self.roster = path;
        }
    }
}
