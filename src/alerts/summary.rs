// ABOUTME: Per-suite response summaries rendered from the execution event log
// ABOUTME: One line per event; suite status degrades on any failed or pending task

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::error::Result;
use crate::engine::result::{ExecutionEvent, RunStatus, TaskStatus};
use crate::rules::comma_joined;

const ERROR_TRUNCATE_CHARS: usize = 120;

/// Suite-level status: FAILED when any event failed or never ran.
pub fn suite_status(events: &[&ExecutionEvent]) -> RunStatus {
    let degraded = events
        .iter()
        .any(|event| matches!(event.status, TaskStatus::Failed | TaskStatus::Pending));
    if degraded {
        RunStatus::Failed
    } else {
        RunStatus::Success
    }
}

/// Render the summary text for one suite.
pub fn render_suite_summary(suite_name: &str, events: &[&ExecutionEvent]) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(format!(
        "Suite {}: {} ({} tasks)",
        suite_name,
        suite_status(events),
        events.len()
    ));

    for (index, event) in events.iter().enumerate() {
        let flags = if event.reasons.is_empty() {
            "none".to_string()
        } else {
            comma_joined(&event.reasons)
        };
        let po = event.po_number.as_deref().unwrap_or("N/A");
        let mut line = format!(
            "{}. {} | {} | flags={} | po={}",
            index + 1,
            event.task,
            event.status,
            flags,
            po
        );
        if let Some(error) = event.error.as_deref() {
            let truncated: String = error.chars().take(ERROR_TRUNCATE_CHARS).collect();
            line.push_str(&format!(" | error={}", truncated));
        }
        lines.push(line);
    }

    lines.join("\n") + "\n"
}

/// Write the summary file into the suite's response directory.
pub async fn write_suite_summary(
    suite_dir: &Path,
    suite_name: &str,
    events: &[&ExecutionEvent],
) -> Result<PathBuf> {
    let content = render_suite_summary(suite_name, events);
    let path = suite_dir
        .join("response")
        .join(format!("{}.summary.txt", suite_name));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&path, content).await?;

    debug!("Suite summary written: {}", path.display());
    Ok(path)
}
