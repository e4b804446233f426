//! Server and direct-mode lookups.

use std::{sync::Arc, time::Duration};

use stargazer_core::{
    AggregatorConfig, GithubSettings, GithubResolver, NoopStarMetrics,
    StarAggregator,
};
use stargazer_model::{RepoStars, StarsRequest, StarsResponse, routes};
use tracing::debug;

use crate::error::ClientError;

/// Talks to a running Stargazer server.
#[derive(Debug, Clone)]
pub struct StarsClient {
    http: reqwest::Client,
    base_url: String,
}

impl StarsClient {
    /// `base_url` must already be validated, see
    /// [`validate_server_url`](crate::validate_server_url). `timeout` bounds
    /// the whole exchange, from connect to the last body byte.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::HttpClient)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Sends one `POST /stars` for the whole batch.
    pub async fn fetch(
        &self,
        repos: &[String],
    ) -> Result<StarsResponse, ClientError> {
        let url = format!("{}{}", self.base_url, routes::STARS);
        let request = StarsRequest::from_names(repos.iter().cloned());
        debug!(%url, repos = repos.len(), "requesting star counts");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Request { url, source })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }
}

/// Settings for resolving against GitHub without a server.
#[derive(Debug, Clone)]
pub struct DirectOptions {
    /// Upstream resolver settings.
    pub github: GithubSettings,
    /// Concurrency cap for the batch.
    pub workers: usize,
    /// Per-call deadline.
    pub call_timeout: Duration,
}

/// Resolves the batch in-process, producing the same rows a server would.
pub async fn resolve_direct(
    repos: &[String],
    options: DirectOptions,
) -> Result<StarsResponse, ClientError> {
    let resolver = GithubResolver::new(options.github, Arc::new(NoopStarMetrics))?;
    let aggregator = StarAggregator::new(
        Arc::new(resolver),
        AggregatorConfig {
            workers: options.workers,
            call_timeout: Some(options.call_timeout),
            batch_timeout: None,
        },
    );

    let repos = aggregator
        .resolve_all(repos.to_vec())
        .await
        .into_iter()
        .map(RepoStars::from)
        .collect();
    Ok(StarsResponse { repos })
}
