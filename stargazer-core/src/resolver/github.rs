use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use stargazer_model::RepoName;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;

use super::StarResolver;
use crate::{
    error::{ProviderError, ResolveError, Result},
    metrics::StarMetrics,
};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Personal access token attached to outbound calls.
#[derive(Clone)]
pub struct GithubCredential(Arc<Zeroizing<String>>);

impl GithubCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::new(Zeroizing::new(token.into())))
    }

    fn header_value(&self) -> String {
        format!("token {}", self.0.as_str())
    }
}

impl fmt::Debug for GithubCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GithubCredential(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub api_url: String,
    pub credential: Option<GithubCredential>,
    /// Applied by the HTTP client to every outbound call.
    pub call_timeout: Option<Duration>,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            credential: None,
            call_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// The subset of `GET /repos/{owner}/{repo}` we care about.
#[derive(Debug, Deserialize)]
struct RepoDocument {
    stargazers_count: u64,
}

/// Resolves star counts with one `GET /repos/{owner}/{repo}` per identifier.
pub struct GithubResolver {
    client: Client,
    api_url: Url,
    credential: Option<GithubCredential>,
    call_timeout: Option<Duration>,
    metrics: Arc<dyn StarMetrics>,
}

impl fmt::Debug for GithubResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubResolver")
            .field("api_url", &self.api_url.as_str())
            .field("authenticated", &self.credential.is_some())
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl GithubResolver {
    pub fn new(
        settings: GithubSettings,
        metrics: Arc<dyn StarMetrics>,
    ) -> std::result::Result<Self, ProviderError> {
        let api_url = Url::parse(&settings.api_url).map_err(|source| {
            ProviderError::InvalidApiUrl {
                url: settings.api_url.clone(),
                source,
            }
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ProviderError::UnsupportedScheme(settings.api_url));
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(limit) = settings.call_timeout {
            builder = builder.timeout(limit);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_url,
            credential: settings.credential,
            call_timeout: settings.call_timeout,
            metrics,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// `{api_url}/repos/{namespace}/{name}`, with each part appended as its
    /// own path segment so nothing in the name can escape the path.
    pub fn repo_url(&self, repo: &RepoName) -> Url {
        let mut url = self.api_url.clone();
        // http(s) URLs always have a path to extend.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "repos",
                repo.namespace(),
                repo.name(),
            ]);
        }
        url
    }

    fn transport_error(&self, repo: &RepoName, err: reqwest::Error) -> ResolveError {
        match self.call_timeout {
            Some(after) if err.is_timeout() => ResolveError::Timeout {
                repo: repo.to_string(),
                after,
            },
            _ => ResolveError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
impl StarResolver for GithubResolver {
    async fn resolve(&self, repo: &str) -> Result<u64> {
        let repo = RepoName::parse(repo)?;
        let url = self.repo_url(&repo);

        let mut request = self.client.get(url).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(credential) = &self.credential {
            request = request.header(AUTHORIZATION, credential.header_value());
        }

        self.metrics.upstream_attempted();
        let response = request.send().await.map_err(|err| {
            warn!(repo = %repo, error = %err, "github request failed");
            self.transport_error(&repo, err)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(repo = %repo, status = status.as_u16(), "github rejected lookup");
            return Err(ResolveError::NotFound {
                repo: repo.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(&repo, err))?;
        let document: RepoDocument =
            serde_json::from_slice(&body).map_err(|err| {
                warn!(repo = %repo, error = %err, "unexpected github payload");
                ResolveError::Decode {
                    repo: repo.to_string(),
                    reason: err.to_string(),
                }
            })?;

        self.metrics.upstream_succeeded();
        debug!(repo = %repo, stars = document.stargazers_count, "resolved");
        Ok(document.stargazers_count)
    }
}
