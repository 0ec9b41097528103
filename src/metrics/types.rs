use std::collections::HashMap;
use std::time::Duration;

use crate::error::RequestError;

/// Outcome of one attempted request.
///
/// `status_code` is 0 when the attempt failed before a response arrived.
#[derive(Debug)]
pub struct RequestResult {
    pub status_code: u16,
    pub duration: Duration,
    pub bytes_read: u64,
    pub error: Option<RequestError>,
}

impl RequestResult {
    #[must_use]
    pub const fn success(status_code: u16, duration: Duration, bytes_read: u64) -> Self {
        Self {
            status_code,
            duration,
            bytes_read,
            error: None,
        }
    }

    #[must_use]
    pub const fn failure(duration: Duration, error: RequestError) -> Self {
        Self {
            status_code: 0,
            duration,
            bytes_read: 0,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
    pub elapsed: Duration,
}

impl Progress {
    /// Completion in tenths of a percent, 0..=1000.
    #[must_use]
    pub fn percent_x10(&self) -> u64 {
        if self.total == 0 {
            return 1000;
        }
        let scaled = u128::from(self.completed).saturating_mul(1000) / u128::from(self.total);
        u64::try_from(scaled).unwrap_or(1000).min(1000)
    }
}

/// Frozen statistics for one run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub total_requests: u64,
    pub success_count: u64,
    pub fail_count: u64,
    pub total_errors: u64,
    pub total_time: Duration,
    pub requests_per_sec: f64,
    pub avg_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
    /// Status code to count. Iteration order is unspecified.
    pub status_codes: HashMap<u16, u64>,
    pub total_bytes: u64,
    /// The first recorded error messages, capped at
    /// [`ERROR_SAMPLE_LIMIT`](super::ERROR_SAMPLE_LIMIT).
    pub errors: Vec<String>,
}

impl Summary {
    /// Errors that were counted but not kept in [`Summary::errors`].
    #[must_use]
    pub fn unsampled_errors(&self) -> u64 {
        let sampled = u64::try_from(self.errors.len()).unwrap_or(u64::MAX);
        self.total_errors.saturating_sub(sampled)
    }

    /// Status codes sorted ascending, for stable output.
    #[must_use]
    pub fn sorted_status_codes(&self) -> Vec<(u16, u64)> {
        let mut codes: Vec<(u16, u64)> = self
            .status_codes
            .iter()
            .map(|(code, count)| (*code, *count))
            .collect();
        codes.sort_unstable_by_key(|(code, _)| *code);
        codes
    }
}
