use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};
use thiserror::Error;

use stargazer_core::{AggregatorConfig, DEFAULT_CALL_TIMEOUT, DEFAULT_WORKERS, GithubCredential};

use super::{
    models::{
        Config, ConfigMetadata, DEFAULT_HOST, DEFAULT_PORT, GithubConfig,
        ServerConfig,
    },
    sources::{EnvConfig, FileConfig, parse_duration},
    validation::ConfigWarnings,
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("stargazer.toml"),
        PathBuf::from("config/stargazer.toml"),
    ]
});

pub const MISSING_TOKEN_WARNING: &str = "GITHUB_TOKEN environment variable not set. API requests to github will be rate limited";

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Loads `.env`, the process environment and the optional TOML file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_from_env(EnvConfig::gather()?)?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Same as [`ConfigLoader::load`] but with an already gathered
    /// environment, skipping `.env` handling.
    pub fn load_from_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) = compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = match (&self.options.config_path, &env.config_path)
        {
            (Some(path), _) | (None, Some(path)) => (Some(path.clone()), true),
            (None, None) => (
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .find(|candidate| candidate.exists())
                    .cloned(),
                false,
            ),
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
                path: path.clone(),
                source,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| {
                ConfigLoadError::Parse {
                    path: path.clone(),
                    source,
                }
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if config_path.is_none() {
        warnings.push_with_hint(
            "No stargazer.toml detected; using environment variables and defaults",
            "Set STARGAZER_CONFIG or pass --config to point at a configuration file",
        );
    }

    let FileConfig {
        server: file_server,
        github: file_github,
        aggregator: file_aggregator,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let token = env
        .github_token
        .or(file_github.token.filter(|token| !token.trim().is_empty()));
    if token.is_none() {
        warnings.push(MISSING_TOKEN_WARNING);
    }
    let github = GithubConfig {
        api_url: env
            .github_api_url
            .or(file_github.api_url)
            .unwrap_or_else(|| stargazer_core::DEFAULT_GITHUB_API_URL.to_string()),
        token: token.map(GithubCredential::new),
    };

    let workers = env
        .workers
        .or(file_aggregator.workers)
        .unwrap_or(DEFAULT_WORKERS);
    if workers == 0 {
        return Err(ConfigLoadError::InvalidValue {
            key: "aggregator.workers".to_string(),
            value: workers.to_string(),
            reason: "worker count must be at least 1".to_string(),
        });
    }

    let call_timeout = match env.call_timeout {
        Some(limit) => limit,
        None => parse_duration(
            "aggregator.call_timeout",
            file_aggregator.call_timeout,
        )?
        .unwrap_or(DEFAULT_CALL_TIMEOUT),
    };
    let batch_timeout = match env.batch_timeout {
        Some(limit) => Some(limit),
        None => parse_duration(
            "aggregator.batch_timeout",
            file_aggregator.batch_timeout,
        )?,
    };

    let config = Config {
        server,
        github,
        aggregator: AggregatorConfig {
            workers,
            call_timeout: Some(call_timeout),
            batch_timeout,
        },
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    };

    Ok((config, warnings))
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
