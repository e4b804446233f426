//! Local checks run before any request is made.

use stargazer_model::RepoName;
use url::Url;

use crate::error::ClientError;

/// Checks every identifier and reports all invalid ones at once.
pub fn validate_repos(repos: &[String]) -> Result<(), ClientError> {
    let invalid: Vec<String> = repos
        .iter()
        .filter(|repo| !RepoName::is_valid(repo))
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ClientError::InvalidRepos(invalid))
    }
}

/// Accepts only absolute `http`/`https` URLs. Trailing slashes are dropped.
pub fn validate_server_url(raw: Option<&str>) -> Result<String, ClientError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ClientError::MissingServer)?;

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        _ => Err(ClientError::InvalidServer(raw.to_string())),
    }
}
