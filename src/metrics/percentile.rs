use std::time::Duration;

/// Nearest-rank index for percentile `p` over `count` sorted samples.
///
/// Computes `ceil(p / 100 * count) - 1` clamped to `0..count`, using integer
/// math. Returns `None` when there are no samples.
#[must_use]
pub fn nearest_rank_index(p: u32, count: usize) -> Option<usize> {
    let last = count.checked_sub(1)?;
    let scaled = u128::from(p).saturating_mul(u128::try_from(count).unwrap_or(u128::MAX));
    let rank = scaled.div_ceil(100);
    let index = usize::try_from(rank).unwrap_or(usize::MAX).saturating_sub(1);
    Some(index.min(last))
}

/// Nearest-rank percentile of an ascending slice; zero when empty.
#[must_use]
pub fn percentile(sorted: &[Duration], p: u32) -> Duration {
    nearest_rank_index(p, sorted.len())
        .and_then(|index| sorted.get(index))
        .copied()
        .unwrap_or_default()
}
