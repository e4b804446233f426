use std::{fmt, sync::Arc};

use stargazer_core::{
    GithubResolver, PrometheusStarMetrics, ProviderError, StarAggregator,
    StarResolver,
};
use tracing::info;

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    aggregator: StarAggregator,
    metrics: Arc<PrometheusStarMetrics>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the GitHub resolver, the counters and the aggregator from a
    /// loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let metrics = Arc::new(PrometheusStarMetrics::new());
        let resolver =
            GithubResolver::new(config.github_settings(), metrics.clone())?;
        info!(
            api_url = %config.github.api_url,
            authenticated = resolver.has_credential(),
            workers = config.aggregator.workers,
            "github resolver ready"
        );
        Ok(Self::with_resolver(config, Arc::new(resolver), metrics))
    }

    /// Builds state around an arbitrary resolver.
    pub fn with_resolver(
        config: &Config,
        resolver: Arc<dyn StarResolver>,
        metrics: Arc<PrometheusStarMetrics>,
    ) -> Self {
        Self {
            aggregator: StarAggregator::new(resolver, config.aggregator.clone()),
            metrics,
        }
    }

    pub fn aggregator(&self) -> &StarAggregator {
        &self.aggregator
    }

    pub fn metrics(&self) -> &PrometheusStarMetrics {
        &self.metrics
    }
}
