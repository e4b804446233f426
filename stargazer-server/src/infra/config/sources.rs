use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use super::loader::ConfigLoadError;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub github: FileGithubConfig,
    #[serde(default)]
    pub aggregator: FileAggregatorConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileGithubConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Durations are humantime strings such as `"10s"` or `"1m 30s"`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAggregatorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_timeout: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub workers: Option<usize>,
    pub call_timeout: Option<Duration>,
    pub batch_timeout: Option<Duration>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            server_host: var("SERVER_HOST"),
            server_port: parse_number("SERVER_PORT", var("SERVER_PORT"))?,
            github_token: var("GITHUB_TOKEN"),
            github_api_url: var("GITHUB_API_URL"),
            workers: parse_number("STARS_WORKERS", var("STARS_WORKERS"))?,
            call_timeout: parse_duration(
                "STARS_CALL_TIMEOUT",
                var("STARS_CALL_TIMEOUT"),
            )?,
            batch_timeout: parse_duration(
                "STARS_BATCH_TIMEOUT",
                var("STARS_BATCH_TIMEOUT"),
            )?,
            config_path: var("STARGAZER_CONFIG").map(PathBuf::from),
        })
    }
}

fn parse_number<T>(
    key: &str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigLoadError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|err: T::Err| ConfigLoadError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
                reason: err.to_string(),
            })
    })
    .transpose()
}

pub(super) fn parse_duration(
    key: &str,
    raw: Option<String>,
) -> Result<Option<Duration>, ConfigLoadError> {
    raw.map(|value| {
        humantime::parse_duration(value.trim()).map_err(|err| {
            ConfigLoadError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
                reason: err.to_string(),
            }
        })
    })
    .transpose()
}
