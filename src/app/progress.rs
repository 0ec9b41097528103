use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::oneshot;

use crate::metrics::{Progress, StatsCollector};

const REFRESH_INTERVAL: Duration = Duration::from_millis(200);
const BAR_WIDTH: usize = 50;

/// Redraw the progress line on stderr until `done_rx` fires, then draw the
/// final state and move to a fresh line.
///
/// Callers decide whether stderr is interactive; this task always renders.
pub(crate) fn setup_progress_indicator(
    stats: Arc<StatsCollector>,
    mut done_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let style = ProgressStyle::new(BAR_WIDTH);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REFRESH_INTERVAL);

        loop {
            tokio::select! {
                _ = &mut done_rx => {
                    if render_progress_line(&style, &stats.progress()).is_err() {
                        break;
                    }
                    if finish_progress_line().is_err() {
                        break;
                    }
                    break;
                }
                _ = ticker.tick() => {
                    if render_progress_line(&style, &stats.progress()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn render_progress_line(style: &ProgressStyle, progress: &Progress) -> Result<(), std::io::Error> {
    let line = build_progress_line(style, progress);

    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        if let Some(color) = segment.color {
            queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&segment.text))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn build_progress_line(style: &ProgressStyle, progress: &Progress) -> Vec<ProgressSegment> {
    let size = style.size.max(1);
    let completed = u128::from(progress.completed);
    let total = u128::from(progress.total);
    let size_u128 = u128::from(u64::try_from(size).unwrap_or(u64::MAX));

    let complete_size = if total == 0 {
        size
    } else {
        let scaled = completed.saturating_mul(size_u128) / total;
        usize::try_from(scaled).unwrap_or(size).min(size)
    };
    let incomplete_size = size.saturating_sub(complete_size);

    let percent_x10 = progress.percent_x10();
    let percent_text = format!(
        " {}/{} ({}.{}%)",
        progress.completed,
        progress.total,
        percent_x10 / 10,
        percent_x10 % 10
    );

    let elapsed_ms = progress.elapsed.as_millis();
    let time_text = format!(
        " | Elapsed: {}.{:03}s",
        elapsed_ms / 1000,
        elapsed_ms % 1000
    );

    let progress_bar = format!(
        "  Progress: {}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );

    vec![
        ProgressSegment::plain(progress_bar),
        ProgressSegment::colored(percent_text, Color::Cyan),
        ProgressSegment::colored(time_text, Color::Yellow),
    ]
}

struct ProgressStyle {
    size: usize,
    begin: String,
    end: String,
    fill: String,
    empty: String,
}

impl ProgressStyle {
    fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[".to_owned(),
            end: "]".to_owned(),
            fill: "#".to_owned(),
            empty: "-".to_owned(),
        }
    }
}

struct ProgressSegment {
    text: String,
    color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}

#[cfg(test)]
pub(crate) fn progress_line_text(progress: &Progress) -> String {
    build_progress_line(&ProgressStyle::new(BAR_WIDTH), progress)
        .into_iter()
        .map(|segment| segment.text)
        .collect()
}
