// ABOUTME: Task model tying one purchase-order input to its run state
// ABOUTME: Carries identity, dependencies, and the most recently fetched document

use std::path::{Path, PathBuf};

use super::result::TaskStatus;
use crate::order::OrderDocument;

/// One purchase-order processing unit. Created once per run by discovery and
/// owned exclusively by the orchestrator while the run executes.
#[derive(Debug, Clone)]
pub struct Task {
    pub suite: String,
    pub name: String,
    pub input_path: PathBuf,
    pub status: TaskStatus,
    pub dependencies: Vec<String>,
    pub document: Option<OrderDocument>,
}

impl Task {
    pub fn new(suite: String, name: String, input_path: PathBuf) -> Self {
        Self {
            suite,
            name,
            input_path,
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
            document: None,
        }
    }

    /// Suite-qualified identity, e.g. "attention_suite/no_flags".
    pub fn id(&self) -> String {
        format!("{}/{}", self.suite, self.name)
    }

    /// The suite directory that owns this task. Inputs normally live in an
    /// `input/` subdirectory; a flat layout is tolerated.
    pub fn suite_dir(&self) -> PathBuf {
        let parent = self.input_path.parent().unwrap_or_else(|| Path::new("."));
        if parent.file_name().and_then(|name| name.to_str()) == Some("input") {
            parent.parent().unwrap_or(parent).to_path_buf()
        } else {
            parent.to_path_buf()
        }
    }

    pub fn alert_path(&self) -> PathBuf {
        self.suite_dir()
            .join("alerts")
            .join(format!("{}.alerts.json", self.name))
    }

    /// Order number from the fetched document, if any.
    pub fn order_number(&self) -> Option<&str> {
        self.document.as_ref().and_then(OrderDocument::order_number)
    }
}
