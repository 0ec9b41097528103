use std::io::Write;
use std::time::Duration;

use crate::metrics::Summary;

use super::SEPARATOR;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

pub(crate) fn print_summary(summary: &Summary) {
    let mut out = std::io::stdout().lock();
    if let Err(err) = write_summary(&mut out, summary) {
        tracing::debug!("Failed to print summary: {}", err);
    }
}

pub(crate) fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, " Results")?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Total Requests:    {}", summary.total_requests)?;
    writeln!(out, "Successful:        {}", summary.success_count)?;
    writeln!(out, "Failed:            {}", summary.fail_count)?;
    writeln!(out, "Total Time:        {}", format_duration(summary.total_time))?;
    writeln!(out, "Requests/sec:      {:.2}", summary.requests_per_sec)?;

    writeln!(out)?;
    writeln!(out, "Latency Distribution:")?;
    writeln!(out, "  Average:   {}", format_duration(summary.avg_duration))?;
    writeln!(out, "  Min:       {}", format_duration(summary.min_duration))?;
    writeln!(out, "  Max:       {}", format_duration(summary.max_duration))?;
    writeln!(out, "  P50:       {}", format_duration(summary.p50))?;
    writeln!(out, "  P90:       {}", format_duration(summary.p90))?;
    writeln!(out, "  P95:       {}", format_duration(summary.p95))?;
    writeln!(out, "  P99:       {}", format_duration(summary.p99))?;

    writeln!(out)?;
    writeln!(out, "Status Code Distribution:")?;
    for (code, count) in summary.sorted_status_codes() {
        writeln!(out, "  [{}] {} responses", code, count)?;
    }

    writeln!(out)?;
    writeln!(out, "Total Data Received: {}", format_bytes(summary.total_bytes))?;

    if !summary.errors.is_empty() {
        writeln!(out)?;
        writeln!(out, "Errors:")?;
        for message in &summary.errors {
            writeln!(out, "  - {}", message)?;
        }
        let unsampled = summary.unsampled_errors();
        if unsampled > 0 {
            writeln!(out, "  ... and {} more errors", unsampled)?;
        }
    }
    out.flush()
}

/// Byte count in binary units with two decimals, or plain bytes below 1 KB.
pub(crate) fn format_bytes(bytes: u64) -> String {
    let (unit, label) = if bytes >= GIB {
        (GIB, "GB")
    } else if bytes >= MIB {
        (MIB, "MB")
    } else if bytes >= KIB {
        (KIB, "KB")
    } else {
        return format!("{} B", bytes);
    };
    let unit = u128::from(unit);
    let hundredths = (u128::from(bytes).saturating_mul(100) + unit / 2) / unit;
    format!("{}.{:02} {}", hundredths / 100, hundredths % 100, label)
}

/// Milliseconds below one second, seconds otherwise, both with two decimals.
pub(crate) fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if duration < Duration::from_secs(1) {
        let hundredths = (nanos + 5_000) / 10_000;
        format!("{}.{:02}ms", hundredths / 100, hundredths % 100)
    } else {
        let hundredths = (nanos + 5_000_000) / 10_000_000;
        format!("{}.{:02}s", hundredths / 100, hundredths % 100)
    }
}
