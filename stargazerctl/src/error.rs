//! Client error type.

use stargazer_core::ProviderError;
use thiserror::Error;

/// Failures surfaced by the command line client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Neither `--server` nor `STARGAZER_SERVER` was provided.
    #[error("STARGAZER_SERVER environment variable not set")]
    MissingServer,
    /// The server address is not an `http` or `https` URL.
    #[error("STARGAZER_SERVER environment variable invalid: {0}")]
    InvalidServer(String),
    /// One or more identifiers failed validation; nothing was sent.
    #[error("{}", invalid_repo_lines(.0))]
    InvalidRepos(Vec<String>),
    /// The HTTP client could not be configured.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// The request never produced a response.
    #[error("request to {url} failed")]
    Request {
        /// Endpoint that was called.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with something other than `200`.
    #[error("server answered {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, trimmed.
        body: String,
    },
    /// The server's `200` body did not match the response schema.
    #[error("failed to decode server response")]
    Decode(#[source] serde_json::Error),
    /// The direct-mode resolver could not be built.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

fn invalid_repo_lines(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("Error: Invalid repo name {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}
