use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::config::LoadPlan;
use crate::error::{HttpError, RunError};
use crate::metrics::StatsCollector;
use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

use super::client::build_client;
use super::executor::RequestExecutor;

/// Job queue slots per worker.
const QUEUE_SLOTS_PER_WORKER: usize = 2;

type JobQueue = Arc<Mutex<mpsc::Receiver<u64>>>;

/// Fixed-size pool of workers pulling request indices from a bounded queue.
#[derive(Debug)]
pub struct LoadPool {
    plan: Arc<LoadPlan>,
    executor: RequestExecutor,
}

impl LoadPool {
    /// Build the shared client for `plan`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(plan: Arc<LoadPlan>) -> Result<Self, HttpError> {
        let client = build_client(&plan)?;
        let executor = RequestExecutor::new(client, Arc::clone(&plan));
        Ok(Self { plan, executor })
    }

    #[must_use]
    pub fn plan(&self) -> &LoadPlan {
        &self.plan
    }

    /// Dispatch indices `0..num_requests` to `concurrency` workers and record
    /// every attempt into `stats`.
    ///
    /// A shutdown signal stops dispatch immediately and aborts in-flight
    /// requests; jobs already queued are still attempted and recorded as
    /// cancelled. All workers have finished when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Cancelled`] when shutdown arrived before every
    /// index was dispatched.
    pub async fn run(
        &self,
        mut shutdown_rx: ShutdownReceiver,
        stats: Arc<StatsCollector>,
    ) -> Result<(), RunError> {
        let concurrency = self.plan.concurrency.max(1);
        let requested = self.plan.num_requests;
        let (job_tx, job_rx) = mpsc::channel::<u64>(concurrency.saturating_mul(QUEUE_SLOTS_PER_WORKER));
        let jobs: JobQueue = Arc::new(Mutex::new(job_rx));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        debug!(
            "Starting {} workers for {} requests",
            concurrency, requested
        );
        let workers: Vec<JoinHandle<()>> = (0..concurrency)
            .map(|_| {
                tokio::spawn(worker_loop(
                    self.executor.clone(),
                    Arc::clone(&jobs),
                    cancel_rx.clone(),
                    Arc::clone(&stats),
                ))
            })
            .collect();
        drop(cancel_rx);

        let mut dispatched: u64 = 0;
        let mut outcome = Ok(());
        while dispatched < requested {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    warn!(
                        "Shutdown requested; stopped dispatch after {} of {} requests",
                        dispatched, requested
                    );
                    cancel_tx.send_replace(true);
                    outcome = Err(RunError::Cancelled { dispatched, requested });
                    break;
                }
                sent = job_tx.send(dispatched) => {
                    if sent.is_err() {
                        error!("Job queue closed with {} of {} requests dispatched", dispatched, requested);
                        break;
                    }
                    dispatched = dispatched.saturating_add(1);
                }
            }
        }
        drop(job_tx);

        let join_workers = join_all(workers);
        tokio::pin!(join_workers);
        if outcome.is_ok() {
            tokio::select! {
                () = &mut join_workers => return outcome,
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    warn!("Shutdown requested; aborting in-flight requests");
                    cancel_tx.send_replace(true);
                }
            }
        }
        join_workers.await;
        outcome
    }
}

async fn worker_loop(
    executor: RequestExecutor,
    jobs: JobQueue,
    mut cancel: watch::Receiver<bool>,
    stats: Arc<StatsCollector>,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(index) = next else {
            break;
        };
        let result = executor.execute(index, &mut cancel).await;
        stats.record(&result);
    }
}

async fn join_all(workers: Vec<JoinHandle<()>>) {
    for handle in workers {
        if let Err(err) = handle.await {
            error!("Worker task failed: {}", err);
        }
    }
}
