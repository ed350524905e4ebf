use std::{num::NonZeroUsize, path::PathBuf};

use config::{Config, ConfigError, File};
use harbor_core::Mmsi;
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};

pub const ENVIRONMENT_VARIABLE: &str = "HARBOR_ENVIRONMENT";
pub const ENVIRONMENT_PREFIX: &str = "HARBOR";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Local,
    Development,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Two vessels whose earliest positions should be measured against each other.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LookupSettings {
    pub from: Mmsi,
    pub to: Mmsi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub input_path: PathBuf,
    pub primary_category: String,
    #[serde(with = "humantime_serde")]
    pub sync_tolerance: std::time::Duration,
    pub num_workers: Option<usize>,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub show_tracks: bool,
    pub lookup: Option<LookupSettings>,
}

impl Settings {
    /// Reads `config/<environment>.yml` with `HARBOR__*` environment variable
    /// overrides, the first command line argument replaces `input_path`.
    pub fn new() -> Result<Self, ConfigError> {
        let environment: Environment = std::env::var(ENVIRONMENT_VARIABLE)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let mut builder = Config::builder()
            .add_source(File::with_name(&format!("config/{environment}")).required(true))
            .add_source(config::Environment::with_prefix(ENVIRONMENT_PREFIX).separator("__"))
            .set_override("environment", environment.as_ref())?;

        if let Some(path) = std::env::args().nth(1) {
            builder = builder.set_override("input_path", path)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
            .or_else(|| std::thread::available_parallelism().ok().map(NonZeroUsize::get))
            .unwrap_or(1)
            .max(1)
    }

    pub fn sync_tolerance(&self) -> Result<chrono::Duration, chrono::OutOfRangeError> {
        chrono::Duration::from_std(self.sync_tolerance)
    }
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl Settings {
        pub fn test_default(input_path: PathBuf) -> Self {
            Self {
                environment: Environment::Test,
                input_path,
                primary_category: "Tug".to_string(),
                sync_tolerance: std::time::Duration::from_secs(120),
                num_workers: Some(2),
                output: OutputFormat::Json,
                show_tracks: false,
                lookup: None,
            }
        }
    }
}
