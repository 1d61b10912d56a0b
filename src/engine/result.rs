// ABOUTME: Run and task status types, execution events, and run aggregation
// ABOUTME: Events are immutable per-task outcome records appended in execution order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::Reason;

/// Per-task state machine states. A task gated by an unmet dependency ends
/// the run still Pending, which is terminal for that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failed => "FAILED",
        }
    }
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Running => "RUNNING",
            RunStatus::Success => "SUCCESS",
            RunStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable record of one task's outcome for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub suite: String,
    pub task: String,
    pub status: TaskStatus,
    pub reasons: Vec<Reason>,
    pub po_number: Option<String>,
    pub error: Option<String>,
}

impl ExecutionEvent {
    pub fn task_id(&self) -> String {
        format!("{}/{}", self.suite, self.task)
    }
}

/// Whole-invocation result: ordered event log plus aggregate status.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: String,
    pub store_run_id: u64,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub events: Vec<ExecutionEvent>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total_tasks: usize,
    pub successful_tasks: usize,
    pub failed_tasks: usize,
    pub pending_tasks: usize,
}

impl RunResult {
    pub fn new(run_id: String, store_run_id: u64) -> Self {
        Self {
            run_id,
            store_run_id,
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            events: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn record_event(&mut self, event: ExecutionEvent) {
        self.events.push(event);
        self.update_summary();
    }

    /// A run fails when any task ended Failed or stayed Pending behind an
    /// unmet dependency.
    pub fn mark_completed(&mut self) {
        self.end_time = Some(Utc::now());
        self.update_summary();
        let failed = self
            .events
            .iter()
            .any(|event| matches!(event.status, TaskStatus::Failed | TaskStatus::Pending));
        self.status = if failed {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };
    }

    pub fn events_for_suite(&self, suite: &str) -> Vec<&ExecutionEvent> {
        self.events
            .iter()
            .filter(|event| event.suite == suite)
            .collect()
    }

    pub fn exit_code(&self) -> i32 {
        if self.status == RunStatus::Success {
            0
        } else {
            1
        }
    }

    fn update_summary(&mut self) {
        self.summary = RunSummary {
            total_tasks: self.events.len(),
            successful_tasks: self
                .events
                .iter()
                .filter(|e| e.status == TaskStatus::Success)
                .count(),
            failed_tasks: self
                .events
                .iter()
                .filter(|e| e.status == TaskStatus::Failed)
                .count(),
            pending_tasks: self
                .events
                .iter()
                .filter(|e| e.status == TaskStatus::Pending)
                .count(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(suite: &str, task: &str, status: TaskStatus) -> ExecutionEvent {
        ExecutionEvent {
            suite: suite.to_string(),
            task: task.to_string(),
            status,
            reasons: Vec::new(),
            po_number: None,
            error: None,
        }
    }

    #[test]
    fn test_all_success_run() {
        let mut result = RunResult::new("run-1".to_string(), 1);
        result.record_event(event("a", "t1", TaskStatus::Success));
        result.record_event(event("a", "t2", TaskStatus::Success));
        result.mark_completed();

        assert_eq!(result.status, RunStatus::Success);
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.summary.successful_tasks, 2);
    }

    #[test]
    fn test_pending_task_fails_the_run() {
        let mut result = RunResult::new("run-1".to_string(), 1);
        result.record_event(event("a", "t1", TaskStatus::Success));
        result.record_event(event("a", "t2", TaskStatus::Pending));
        result.mark_completed();

        assert_eq!(result.status, RunStatus::Failed);
        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.summary.pending_tasks, 1);
    }

    #[test]
    fn test_failed_task_fails_the_run() {
        let mut result = RunResult::new("run-1".to_string(), 1);
        result.record_event(event("a", "t1", TaskStatus::Failed));
        result.mark_completed();

        assert_eq!(result.status, RunStatus::Failed);
        assert_eq!(result.summary.failed_tasks, 1);
    }

    #[test]
    fn test_events_for_suite_preserves_order() {
        let mut result = RunResult::new("run-1".to_string(), 1);
        result.record_event(event("a", "t1", TaskStatus::Success));
        result.record_event(event("b", "t2", TaskStatus::Success));
        result.record_event(event("a", "t3", TaskStatus::Failed));

        let suite_a = result.events_for_suite("a");
        assert_eq!(suite_a.len(), 2);
        assert_eq!(suite_a[0].task, "t1");
        assert_eq!(suite_a[1].task, "t3");
    }

    #[test]
    fn test_status_serialization_tokens() {
        let token = serde_json::to_string(&TaskStatus::Success).unwrap();
        assert_eq!(token, "\"SUCCESS\"");
        assert_eq!(TaskStatus::Pending.to_string(), "PENDING");
    }
}
