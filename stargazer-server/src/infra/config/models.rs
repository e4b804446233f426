use std::{fmt, path::PathBuf};

use stargazer_core::{AggregatorConfig, GithubCredential, GithubSettings};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9999;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GithubConfig,
    pub aggregator: AggregatorConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Settings for the upstream resolver. The per-call deadline is shared
    /// with the aggregator.
    pub fn github_settings(&self) -> GithubSettings {
        GithubSettings {
            api_url: self.github.api_url.clone(),
            credential: self.github.token.clone(),
            call_timeout: self.aggregator.call_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Clone)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<GithubCredential>,
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token_configured", &self.token.is_some())
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: stargazer_core::DEFAULT_GITHUB_API_URL.to_string(),
            token: None,
        }
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
