//! Request counters shared by the resolver and the HTTP layer.
//!
//! Counters are injected as a [`StarMetrics`] trait object at construction
//! time. [`PrometheusStarMetrics`] is the production implementation. It owns
//! its own Prometheus recorder rather than installing a global one, so every
//! server instance (and every test) scrapes only its own counters.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use metrics::Counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const STARS_REQUESTS_ALL: &str = "api_requests_stars_all";
const STARS_REQUESTS_OK: &str = "api_requests_stars_200";
const UPSTREAM_REQUESTS_ALL: &str = "api_requests_github_all";
const UPSTREAM_REQUESTS_OK: &str = "api_requests_github_200";

/// Observability hooks invoked from concurrent resolution tasks.
///
/// Implementations must be safe to call from many tasks at once.
pub trait StarMetrics: Send + Sync + fmt::Debug {
    /// An outbound call to the upstream API is about to be made.
    fn upstream_attempted(&self);
    /// An outbound call returned a decodable success response.
    fn upstream_succeeded(&self);
    /// A `/stars` request reached the handler.
    fn stars_request_received(&self);
    /// A `/stars` request was answered with `200`.
    fn stars_request_completed(&self);
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub stars_requests_all: u64,
    pub stars_requests_ok: u64,
    pub upstream_requests_all: u64,
    pub upstream_requests_ok: u64,
}

/// A registered Prometheus counter plus a local reading of its value.
///
/// The exporter only exposes counters through rendered text, so the local
/// reading backs [`PrometheusStarMetrics::snapshot`].
struct Tally {
    counter: Counter,
    value: AtomicU64,
}

impl Tally {
    fn increment(&self) {
        self.counter.increment(1);
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Counters registered on a private Prometheus recorder.
pub struct PrometheusStarMetrics {
    handle: PrometheusHandle,
    stars_requests_all: Tally,
    stars_requests_ok: Tally,
    upstream_requests_all: Tally,
    upstream_requests_ok: Tally,
}

impl fmt::Debug for PrometheusStarMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrometheusStarMetrics")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl Default for PrometheusStarMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusStarMetrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let register = |name: &'static str, help: &'static str| {
            metrics::with_local_recorder(&recorder, || {
                metrics::describe_counter!(name, help);
                Tally {
                    counter: metrics::counter!(name),
                    value: AtomicU64::new(0),
                }
            })
        };

        Self {
            stars_requests_all: register(
                STARS_REQUESTS_ALL,
                "The total number of processed requests from the stars api",
            ),
            stars_requests_ok: register(
                STARS_REQUESTS_OK,
                "The total number of 200 requests from the stars api",
            ),
            upstream_requests_all: register(
                UPSTREAM_REQUESTS_ALL,
                "The total number of outgoing requests to github",
            ),
            upstream_requests_ok: register(
                UPSTREAM_REQUESTS_OK,
                "The total number of 200 requests to github",
            ),
            handle,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            stars_requests_all: self.stars_requests_all.get(),
            stars_requests_ok: self.stars_requests_ok.get(),
            upstream_requests_all: self.upstream_requests_all.get(),
            upstream_requests_ok: self.upstream_requests_ok.get(),
        }
    }

    /// Prometheus text exposition of every registered counter.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl StarMetrics for PrometheusStarMetrics {
    fn upstream_attempted(&self) {
        self.upstream_requests_all.increment();
    }

    fn upstream_succeeded(&self) {
        self.upstream_requests_ok.increment();
    }

    fn stars_request_received(&self) {
        self.stars_requests_all.increment();
    }

    fn stars_request_completed(&self) {
        self.stars_requests_ok.increment();
    }
}

/// Discards every event. Used where nothing scrapes the counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStarMetrics;

impl StarMetrics for NoopStarMetrics {
    fn upstream_attempted(&self) {}
    fn upstream_succeeded(&self) {}
    fn stars_request_received(&self) {}
    fn stars_request_completed(&self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sample_line<'a>(text: &'a str, name: &str) -> Option<&'a str> {
        text.lines()
            .find(|line| line.split_whitespace().next() == Some(name))
    }

    #[test]
    fn render_lists_counted_series() {
        let metrics = PrometheusStarMetrics::new();
        metrics.stars_request_received();
        metrics.upstream_attempted();
        metrics.upstream_attempted();
        metrics.upstream_succeeded();

        let text = metrics.render();
        assert_eq!(
            sample_line(&text, STARS_REQUESTS_ALL),
            Some("api_requests_stars_all 1")
        );
        assert_eq!(
            sample_line(&text, UPSTREAM_REQUESTS_ALL),
            Some("api_requests_github_all 2")
        );
        assert_eq!(
            sample_line(&text, UPSTREAM_REQUESTS_OK),
            Some("api_requests_github_200 1")
        );
        assert!(text.contains("# TYPE api_requests_github_all counter"));
        assert!(text.contains(
            "# HELP api_requests_github_all The total number of outgoing requests to github"
        ));
    }

    #[test]
    fn instances_do_not_share_counters() {
        let first = PrometheusStarMetrics::new();
        let second = PrometheusStarMetrics::new();
        first.stars_request_received();
        first.stars_request_received();

        assert_eq!(first.snapshot().stars_requests_all, 2);
        assert_eq!(second.snapshot().stars_requests_all, 0);
        assert_eq!(
            sample_line(&first.render(), STARS_REQUESTS_ALL),
            Some("api_requests_stars_all 2")
        );
        assert_ne!(
            sample_line(&second.render(), STARS_REQUESTS_ALL),
            Some("api_requests_stars_all 2")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let metrics = Arc::new(PrometheusStarMetrics::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let metrics = Arc::clone(&metrics);
            handles.push(tokio::spawn(async move {
                for _ in 0..1_000 {
                    metrics.upstream_attempted();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(metrics.snapshot().upstream_requests_all, 8_000);
        assert_eq!(
            sample_line(&metrics.render(), UPSTREAM_REQUESTS_ALL),
            Some("api_requests_github_all 8000")
        );
    }
}
