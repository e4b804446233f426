//! Batch resolution over a bounded worker pool.
//!
//! A batch of N identifiers is validated up front, then the valid ones are
//! queued as `(index, name)` jobs. `min(workers, N)` tasks drain the queue,
//! each calling the resolver once per job and reporting `(index, outcome)`
//! back. Outcomes land in slots pre-sized to the input, so the returned list
//! is always index-aligned with the request no matter which call finished
//! first. A lookup that panics fails its own slot and the worker moves on to
//! the next job.

use std::{any::Any, fmt, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::FutureExt;

use stargazer_model::{RepoName, RepoStars};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinSet,
    time::timeout,
};
use tracing::{debug, error, info, trace, warn};

use crate::{
    error::{ResolveError, Result},
    resolver::StarResolver,
};

pub const DEFAULT_WORKERS: usize = 16;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Upper bound on concurrent outbound calls per batch.
    pub workers: usize,
    /// Deadline for a single resolution.
    pub call_timeout: Option<Duration>,
    /// Deadline for the whole batch. Items still pending when it fires are
    /// reported as failures.
    pub batch_timeout: Option<Duration>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            call_timeout: Some(DEFAULT_CALL_TIMEOUT),
            batch_timeout: None,
        }
    }
}

/// Result for one requested identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub name: String,
    pub outcome: Result<u64>,
}

impl RepoOutcome {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl From<RepoOutcome> for RepoStars {
    fn from(value: RepoOutcome) -> Self {
        match value.outcome {
            Ok(stars) => RepoStars::success(value.name, stars),
            Err(err) => RepoStars::failure(value.name, err.to_string()),
        }
    }
}

struct Job {
    index: usize,
    name: String,
}

type Slot = Option<Result<u64>>;

#[derive(Clone)]
pub struct StarAggregator {
    resolver: Arc<dyn StarResolver>,
    config: AggregatorConfig,
}

impl fmt::Debug for StarAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarAggregator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StarAggregator {
    pub fn new(resolver: Arc<dyn StarResolver>, config: AggregatorConfig) -> Self {
        Self { resolver, config }
    }

    /// Resolve every identifier and return one outcome per input, in input
    /// order. Never fails as a whole; per-item failures are carried in
    /// [`RepoOutcome::outcome`].
    pub async fn resolve_all(&self, names: Vec<String>) -> Vec<RepoOutcome> {
        let total = names.len();
        let mut slots: Vec<Slot> = Vec::with_capacity(total);
        let mut jobs = Vec::new();

        for (index, name) in names.iter().enumerate() {
            if RepoName::is_valid(name) {
                slots.push(None);
                jobs.push(Job {
                    index,
                    name: name.clone(),
                });
            } else {
                slots.push(Some(Err(ResolveError::InvalidIdentifier(
                    name.clone(),
                ))));
            }
        }

        let deadline_hit = if jobs.is_empty() {
            false
        } else {
            self.run_pool(jobs, &mut slots).await
        };

        let outcomes: Vec<RepoOutcome> = names
            .into_iter()
            .zip(slots)
            .map(|(name, slot)| {
                let outcome = slot.unwrap_or_else(|| {
                    if deadline_hit {
                        Err(ResolveError::BatchDeadline(name.clone()))
                    } else {
                        Err(ResolveError::WorkerLost(name.clone()))
                    }
                });
                RepoOutcome { name, outcome }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(total, failed, "star batch resolved");
        outcomes
    }

    /// Drives the worker pool until every job reported back or the batch
    /// deadline fired. Returns `true` when the deadline fired.
    async fn run_pool(&self, jobs: Vec<Job>, slots: &mut [Slot]) -> bool {
        let job_count = jobs.len();
        let workers = self.config.workers.max(1).min(job_count);

        let (job_tx, job_rx) = mpsc::channel::<Job>(job_count);
        for job in jobs {
            // Capacity equals the job count and the receiver is alive.
            let _ = job_tx.try_send(job);
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) =
            mpsc::unbounded_channel::<(usize, Result<u64>)>();

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let resolver = Arc::clone(&self.resolver);
            let call_timeout = self.config.call_timeout;
            pool.spawn(async move {
                loop {
                    let job = {
                        let mut guard = job_rx.lock().await;
                        guard.recv().await
                    };
                    let Some(job) = job else { break };
                    let outcome = AssertUnwindSafe(resolve_one(
                        resolver.as_ref(),
                        &job.name,
                        call_timeout,
                    ))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        error!(
                            worker_id,
                            repo = %job.name,
                            reason = panic_message(panic.as_ref()),
                            "star lookup panicked"
                        );
                        Err(ResolveError::WorkerLost(job.name.clone()))
                    });
                    if results.send((job.index, outcome)).is_err() {
                        break;
                    }
                }
                trace!(worker_id, "star worker drained queue");
            });
        }
        drop(result_tx);
        debug!(workers, jobs = job_count, "star worker pool started");

        let collect = async {
            while let Some((index, outcome)) = result_rx.recv().await {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(outcome);
                }
            }
        };

        let deadline_hit = match self.config.batch_timeout {
            Some(limit) => {
                let expired = timeout(limit, collect).await.is_err();
                if expired {
                    warn!(
                        after = %humantime::format_duration(limit),
                        "batch deadline exceeded; abandoning pending lookups"
                    );
                    pool.abort_all();
                }
                expired
            }
            None => {
                collect.await;
                false
            }
        };

        while let Some(joined) = pool.join_next().await {
            if let Err(err) = joined
                && err.is_panic()
            {
                error!(error = %err, "star worker panicked");
            }
        }

        deadline_hit
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    }
}

async fn resolve_one(
    resolver: &dyn StarResolver,
    name: &str,
    call_timeout: Option<Duration>,
) -> Result<u64> {
    let outcome = match call_timeout {
        Some(limit) => match timeout(limit, resolver.resolve(name)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ResolveError::Timeout {
                repo: name.to_string(),
                after: limit,
            }),
        },
        None => resolver.resolve(name).await,
    };

    if let Err(err) = &outcome {
        debug!(repo = name, error = %err, "repository resolution failed");
    }
    outcome
}
