// ABOUTME: Per-task alert files written on every task outcome
// ABOUTME: JSON payload with status, reasons, document fields, and a timestamp

use chrono::Utc;
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use super::error::Result;
use crate::engine::result::TaskStatus;
use crate::engine::task::Task;
use crate::rules::Reason;

/// Controls which outcomes produce an alert file. A Success with no reasons
/// carries no signal, so it is suppressed unless configured otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPolicy {
    pub write_unflagged_success: bool,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            write_unflagged_success: false,
        }
    }
}

#[derive(Serialize)]
struct AlertPayload<'a> {
    po_number: Option<&'a str>,
    status: TaskStatus,
    reasons: &'a [Reason],
    fields: serde_json::Value,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Write the alert file for one task outcome. Returns whether a file was
/// written.
pub async fn write_alert(
    task: &Task,
    status: TaskStatus,
    reasons: &[Reason],
    error: Option<&str>,
    policy: &AlertPolicy,
) -> Result<bool> {
    if status == TaskStatus::Success && reasons.is_empty() && !policy.write_unflagged_success {
        debug!("Skipping alert for unflagged success: {}", task.id());
        return Ok(false);
    }

    let fields = match &task.document {
        Some(document) => serde_json::to_value(document)?,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };

    let payload = AlertPayload {
        po_number: task.order_number(),
        status,
        reasons,
        fields,
        timestamp: Utc::now().to_rfc3339(),
        error,
    };

    let path = task.alert_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&path, serde_json::to_string_pretty(&payload)?).await?;

    debug!("Alert written: {}", path.display());
    Ok(true)
}
