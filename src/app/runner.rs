use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::info;

use crate::config::LoadPlan;
use crate::error::{AppResult, RunError};
use crate::http::LoadPool;
use crate::metrics::{StatsCollector, Summary};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

use super::progress::setup_progress_indicator;

/// What a finished run hands back to the caller.
#[derive(Debug)]
pub(crate) struct RunReport {
    pub(crate) summary: Summary,
    /// Set when a shutdown signal stopped dispatch early.
    pub(crate) cancelled: Option<RunError>,
}

pub(crate) async fn run_load(plan: LoadPlan, show_progress: bool) -> AppResult<RunReport> {
    let plan = Arc::new(plan);
    let pool = LoadPool::new(Arc::clone(&plan))?;
    let stats = Arc::new(StatsCollector::new(plan.num_requests));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let (done_tx, done_rx) = oneshot::channel();
    let progress_handle =
        show_progress.then(|| setup_progress_indicator(Arc::clone(&stats), done_rx));

    info!(
        "Starting run: {} requests across {} workers",
        plan.num_requests, plan.concurrency
    );
    let outcome = pool.run(shutdown_rx, Arc::clone(&stats)).await;

    if done_tx.send(()).is_err() {
        tracing::debug!("Progress indicator was not running");
    }
    if let Some(handle) = progress_handle {
        handle.await?;
    }
    signal_handle.abort();

    Ok(RunReport {
        summary: stats.summary(),
        cancelled: outcome.err(),
    })
}
