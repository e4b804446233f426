use std::time::Duration;

use stargazer_model::ModelError;
use thiserror::Error;

/// Why a single repository could not be resolved to a star count.
///
/// The `Display` text of each variant is the reason reported to callers, so
/// it stays stable across releases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("received invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    Transport(String),

    #[error("request for {repo} timed out after {}", format_after(.after))]
    Timeout { repo: String, after: Duration },

    /// Any non-success upstream status. The status is kept for logging only.
    #[error("resource not found: {repo}")]
    NotFound { repo: String, status: u16 },

    #[error("unexpected response body for {repo}: {reason}")]
    Decode { repo: String, reason: String },

    #[error("batch deadline exceeded before {0} resolved")]
    BatchDeadline(String),

    #[error("resolution of {0} did not complete")]
    WorkerLost(String),
}

impl From<ModelError> for ResolveError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidRepoName(name) => Self::InvalidIdentifier(name),
        }
    }
}

/// Errors raised while constructing a resolver.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid GitHub API URL '{url}'")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("GitHub API URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

fn format_after(after: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*after)
}
