use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Run cancelled after dispatching {dispatched} of {requested} requests.")]
    Cancelled { dispatched: u64, requested: u64 },
}
