use std::time::Duration;

use reqwest::Client;

use crate::config::LoadPlan;
use crate::error::HttpError;

pub const DEFAULT_USER_AGENT: &str = concat!("volley/", env!("CARGO_PKG_VERSION"));
/// Idle connections kept per host beyond the worker count.
pub const IDLE_CONNECTION_HEADROOM: usize = 10;
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the one connection-reusing client shared by every worker.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(plan: &LoadPlan) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(plan.timeout)
        .pool_max_idle_per_host(plan.concurrency.saturating_add(IDLE_CONNECTION_HEADROOM))
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| {
            tracing::error!("Failed to build HTTP client: {}", err);
            HttpError::BuildClientFailed { source: err }
        })
}
