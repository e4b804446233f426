//! Single-item resolution: one identifier in, one star count or one
//! classified failure out.

mod github;

pub use github::{
    DEFAULT_GITHUB_API_URL, GithubCredential, GithubResolver, GithubSettings,
};

use async_trait::async_trait;

use crate::error::Result;

/// Resolves a single raw identifier to its star count.
///
/// Implementations never panic on upstream misbehaviour; every outcome is
/// returned as a [`ResolveError`](crate::ResolveError) so that a batch can
/// keep going. Each call performs at most one outbound request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StarResolver: Send + Sync {
    async fn resolve(&self, repo: &str) -> Result<u64>;
}
