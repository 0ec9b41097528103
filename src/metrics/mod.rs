//! Run statistics: per-request results, live progress, and the final summary.
mod collector;
mod percentile;
mod types;


pub use collector::StatsCollector;
pub use percentile::{nearest_rank_index, percentile};
pub use types::{Progress, RequestResult, Summary};

/// Maximum number of error messages kept for the summary.
pub const ERROR_SAMPLE_LIMIT: usize = 10;
