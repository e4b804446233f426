//! # Stargazer Core
//!
//! Resolution engine behind the Stargazer server and CLI: turns a batch of
//! `<namespace>/<name>` repository identifiers into star counts, one
//! outcome per input, in input order.
//!
//! ## Architecture
//!
//! - [`resolver`]: the [`StarResolver`] trait and the GitHub REST
//!   implementation, [`GithubResolver`]
//! - [`aggregator`]: [`StarAggregator`], which fans a batch out over a
//!   bounded worker pool and reassembles the results by index
//! - [`metrics`]: request counters shared with the HTTP layer
//! - [`error`]: per-item failure classification
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use stargazer_core::{
//!     AggregatorConfig, GithubResolver, GithubSettings, NoopStarMetrics,
//!     StarAggregator,
//! };
//!
//! # async fn run() -> Result<(), stargazer_core::ProviderError> {
//! let resolver = GithubResolver::new(
//!     GithubSettings::default(),
//!     Arc::new(NoopStarMetrics),
//! )?;
//! let aggregator =
//!     StarAggregator::new(Arc::new(resolver), AggregatorConfig::default());
//!
//! for outcome in aggregator
//!     .resolve_all(vec!["rust-lang/rust".into(), "tokio-rs/tokio".into()])
//!     .await
//! {
//!     println!("{}: {:?}", outcome.name, outcome.outcome);
//! }
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod aggregator;
pub mod error;
pub mod metrics;
pub mod resolver;

pub use aggregator::{
    AggregatorConfig, DEFAULT_CALL_TIMEOUT, DEFAULT_WORKERS, RepoOutcome,
    StarAggregator,
};
pub use error::{ProviderError, ResolveError, Result};
pub use metrics::{
    MetricsSnapshot, NoopStarMetrics, PrometheusStarMetrics, StarMetrics,
};
pub use resolver::{
    DEFAULT_GITHUB_API_URL, GithubCredential, GithubResolver, GithubSettings,
    StarResolver,
};
