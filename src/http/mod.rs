//! Shared HTTP client, per-request execution, and the bounded worker pool.
mod client;
mod executor;
mod pool;

#[cfg(test)]
pub(crate) mod test_server;
#[cfg(test)]
mod tests;

pub use client::{DEFAULT_USER_AGENT, IDLE_CONNECTION_HEADROOM, POOL_IDLE_TIMEOUT, build_client};
pub use executor::RequestExecutor;
pub use pool::LoadPool;
