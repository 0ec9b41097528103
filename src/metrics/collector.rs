use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::percentile::percentile;
use super::{ERROR_SAMPLE_LIMIT, Progress, RequestResult, Summary};

const MAX_PREALLOCATED_SAMPLES: usize = 1 << 20;

#[derive(Debug)]
struct StatsState {
    total: u64,
    success: u64,
    fail: u64,
    total_errors: u64,
    status_codes: HashMap<u16, u64>,
    durations: Vec<Duration>,
    duration_sum: Duration,
    min_duration: Option<Duration>,
    max_duration: Duration,
    bytes: u64,
    errors: Vec<String>,
}

/// Mutex-guarded run statistics shared by every worker.
///
/// Each [`StatsCollector::record`] is a single critical section; network I/O
/// never happens while the lock is held.
#[derive(Debug)]
pub struct StatsCollector {
    state: Mutex<StatsState>,
    started: Instant,
    expected: u64,
}

impl StatsCollector {
    /// Create a collector for a run of `expected` requests. The run clock
    /// starts now.
    #[must_use]
    pub fn new(expected: u64) -> Self {
        let capacity = usize::try_from(expected)
            .unwrap_or(MAX_PREALLOCATED_SAMPLES)
            .min(MAX_PREALLOCATED_SAMPLES);
        Self {
            state: Mutex::new(StatsState {
                total: 0,
                success: 0,
                fail: 0,
                total_errors: 0,
                status_codes: HashMap::new(),
                durations: Vec::with_capacity(capacity),
                duration_sum: Duration::ZERO,
                min_duration: None,
                max_duration: Duration::ZERO,
                bytes: 0,
                errors: Vec::new(),
            }),
            started: Instant::now(),
            expected,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, result: &RequestResult) {
        let mut state = self.lock();
        state.total = state.total.saturating_add(1);

        if let Some(error) = result.error.as_ref() {
            state.fail = state.fail.saturating_add(1);
            state.total_errors = state.total_errors.saturating_add(1);
            if state.errors.len() < ERROR_SAMPLE_LIMIT {
                state.errors.push(error.to_string());
            }
        } else {
            state.success = state.success.saturating_add(1);
            let count = state.status_codes.entry(result.status_code).or_insert(0);
            *count = count.saturating_add(1);
        }

        state.duration_sum = state.duration_sum.saturating_add(result.duration);
        state.min_duration = Some(
            state
                .min_duration
                .map_or(result.duration, |min| min.min(result.duration)),
        );
        state.max_duration = state.max_duration.max(result.duration);
        state.durations.push(result.duration);
        state.bytes = state.bytes.saturating_add(result.bytes_read);
    }

    /// Snapshot of how many results have been recorded so far.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let completed = self.lock().total;
        Progress {
            completed,
            total: self.expected.max(completed),
            elapsed: self.started.elapsed(),
        }
    }

    /// Freeze the statistics into a [`Summary`].
    ///
    /// Call once all workers have finished; results recorded afterwards are
    /// not reflected.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let total_time = self.started.elapsed();
        let (mut durations, summary) = {
            let state = self.lock();
            let avg_duration = if state.total == 0 {
                Duration::ZERO
            } else {
                let nanos = state.duration_sum.as_nanos() / u128::from(state.total);
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            };
            let summary = Summary {
                total_requests: state.total,
                success_count: state.success,
                fail_count: state.fail,
                total_errors: state.total_errors,
                total_time,
                requests_per_sec: requests_per_sec(state.total, total_time),
                avg_duration,
                min_duration: state.min_duration.unwrap_or_default(),
                max_duration: state.max_duration,
                p50: Duration::ZERO,
                p90: Duration::ZERO,
                p95: Duration::ZERO,
                p99: Duration::ZERO,
                status_codes: state.status_codes.clone(),
                total_bytes: state.bytes,
                errors: state.errors.clone(),
            };
            (state.durations.clone(), summary)
        };

        durations.sort_unstable();
        Summary {
            p50: percentile(&durations, 50),
            p90: percentile(&durations, 90),
            p95: percentile(&durations, 95),
            p99: percentile(&durations, 99),
            ..summary
        }
    }
}

fn requests_per_sec(total: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        total as f64 / secs
    } else {
        0.0
    }
}
