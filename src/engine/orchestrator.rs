// ABOUTME: Sequential task orchestrator driving the per-task state machine
// ABOUTME: Applies dependency gating, bounded retries, stock reservation, and event emission

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::error::Result;
use super::graph;
use super::result::{ExecutionEvent, RunResult, RunStatus, TaskStatus};
use super::task::Task;
use crate::alerts::{self, AlertPolicy};
use crate::order::OrderSource;
use crate::rules::{self, comma_joined, Reason, RulePolicy};
use crate::stock::{InventoryPool, ReservationOutcome};
use crate::store::{RunStore, TaskOutput};

const DEFAULT_MAX_RETRIES: u32 = 2;

/// Drives every discovered task through its state machine, strictly
/// sequentially in the deterministic topological order. A failed task never
/// aborts the schedule; its dependents gate to PENDING and the run completes
/// with a full event log.
pub struct Orchestrator {
    source: Arc<dyn OrderSource>,
    store: Arc<dyn RunStore>,
    pool: Arc<InventoryPool>,
    policy: RulePolicy,
    alert_policy: AlertPolicy,
    max_retries: u32,
    task_delay: Option<Duration>,
}

struct TaskOutcome {
    status: TaskStatus,
    reasons: Vec<Reason>,
    error: Option<String>,
}

enum AttemptFailure {
    /// Blocking rule or reservation shortfall; all evaluated reasons kept.
    Blocking {
        reasons: Vec<Reason>,
        blocking: Vec<Reason>,
    },
    /// Unexpected failure (source, store, or stock service internals).
    Error { message: String },
}

impl AttemptFailure {
    fn internal(err: impl std::fmt::Display) -> Self {
        AttemptFailure::Error {
            message: err.to_string(),
        }
    }
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn OrderSource>,
        store: Arc<dyn RunStore>,
        pool: Arc<InventoryPool>,
    ) -> Self {
        Self {
            source,
            store,
            pool,
            policy: RulePolicy::default(),
            alert_policy: AlertPolicy::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            task_delay: None,
        }
    }

    pub fn with_policy(mut self, policy: RulePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_alert_policy(mut self, alert_policy: AlertPolicy) -> Self {
        self.alert_policy = alert_policy;
        self
    }

    /// Retries after the first attempt; each task gets `max_retries + 1`
    /// attempts in total.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Injected latency before each task, useful when observing a run.
    pub fn with_task_delay(mut self, task_delay: Option<Duration>) -> Self {
        self.task_delay = task_delay;
        self
    }

    /// Execute a complete workflow run over the tasks under `root`.
    pub async fn run(&self, root: &Path, suite: Option<&str>) -> Result<RunResult> {
        let mut tasks = graph::discover(root, suite)?;
        let task_ids: Vec<String> = tasks.keys().cloned().collect();

        let dependencies = graph::load_dependencies(root, &task_ids, suite)?;
        for (task_id, deps) in dependencies {
            if let Some(task) = tasks.get_mut(&task_id) {
                task.dependencies = deps;
            }
        }

        let order = graph::topo_sort(&tasks)?;

        let store_run_id = self.store.create_run().await?;
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Workflow run {} created (store id {}). PENDING -> RUNNING",
            run_id, store_run_id
        );
        self.store
            .transition_run(store_run_id, RunStatus::Running, None)
            .await?;

        let mut result = RunResult::new(run_id, store_run_id);
        let mut completed: HashMap<String, TaskStatus> = HashMap::new();

        for task_id in &order {
            if let Some(delay) = self.task_delay {
                sleep(delay).await;
            }

            let task = match tasks.get_mut(task_id) {
                Some(task) => task,
                None => continue,
            };
            info!("TASK START: {}", task_id);

            let unmet: Vec<String> = task
                .dependencies
                .iter()
                .filter(|dep| completed.get(dep.as_str()) != Some(&TaskStatus::Success))
                .cloned()
                .collect();

            let outcome = if !unmet.is_empty() {
                let upstream_failed = unmet
                    .iter()
                    .any(|dep| completed.get(dep.as_str()) == Some(&TaskStatus::Failed));
                let gate_reason = if upstream_failed {
                    Reason::WaitingOnUpstream
                } else {
                    Reason::WaitingOnDependency
                };
                let message = format!(
                    "Dependencies not satisfied for {}: {}",
                    task_id,
                    unmet.join(", ")
                );
                info!("{}: PENDING ({})", task_id, gate_reason);
                TaskOutcome {
                    status: TaskStatus::Pending,
                    reasons: vec![gate_reason],
                    error: Some(message),
                }
            } else {
                self.execute_task(store_run_id, task).await
            };

            alerts::write_alert(
                task,
                outcome.status,
                &outcome.reasons,
                outcome.error.as_deref(),
                &self.alert_policy,
            )
            .await?;

            result.record_event(ExecutionEvent {
                suite: task.suite.clone(),
                task: task.name.clone(),
                status: outcome.status,
                reasons: outcome.reasons.clone(),
                po_number: task.order_number().map(str::to_string),
                error: outcome.error.clone(),
            });
            completed.insert(task_id.clone(), outcome.status);
            info!("TASK END: {} -> {}", task_id, outcome.status);
        }

        let any_failed = completed
            .values()
            .any(|status| matches!(status, TaskStatus::Failed | TaskStatus::Pending));
        if any_failed {
            self.store
                .transition_run(
                    store_run_id,
                    RunStatus::Failed,
                    Some("one_or_more_tasks_failed"),
                )
                .await?;
        } else {
            self.store
                .transition_run(store_run_id, RunStatus::Success, None)
                .await?;
        }
        result.mark_completed();

        self.write_suite_summaries(root, &result).await?;

        info!("Final workflow status: {}", result.status);
        Ok(result)
    }

    /// Run one task through fetch, rule evaluation, stock reservation, and
    /// the bounded attempt loop. Dependency gating happened already.
    async fn execute_task(&self, store_run_id: u64, task: &mut Task) -> TaskOutcome {
        // Setup: the initial fetch and the store bookkeeping it feeds. A
        // failure here is fatal for the task with no retry.
        let document = match self.source.extract(&task.input_path).await {
            Ok(document) => document,
            Err(err) => return setup_failure(task, err.to_string()),
        };
        task.document = Some(document);

        let task_run_id = match self.store.create_task_run(store_run_id, task).await {
            Ok(id) => id,
            Err(err) => return setup_failure(task, err.to_string()),
        };

        task.status = TaskStatus::Running;
        info!("{}: PENDING -> RUNNING", task.id());
        if let Err(err) = self
            .store
            .transition_task(task_run_id, TaskStatus::Running, None)
            .await
        {
            return setup_failure(task, err.to_string());
        }

        let mut last_failure: Option<AttemptFailure> = None;
        for attempt in 1..=self.max_retries + 1 {
            match self.attempt(task, task_run_id, attempt).await {
                Ok(reasons) => {
                    task.status = TaskStatus::Success;
                    info!("{}: RUNNING -> SUCCESS", task.id());
                    return TaskOutcome {
                        status: TaskStatus::Success,
                        reasons,
                        error: None,
                    };
                }
                Err(failure) => {
                    if attempt <= self.max_retries {
                        // Retries are internal; nothing is emitted yet.
                        debug!(
                            "{}: retry {}/{} after blocked attempt",
                            task.id(),
                            attempt,
                            self.max_retries
                        );
                        continue;
                    }
                    last_failure = Some(failure);
                }
            }
        }

        let failure = last_failure.unwrap_or(AttemptFailure::Error {
            message: "attempt loop produced no outcome".to_string(),
        });
        let (reasons, error_message) = match failure {
            AttemptFailure::Blocking { reasons, blocking } => (reasons, comma_joined(&blocking)),
            AttemptFailure::Error { message } => {
                let reasons = match classify_error(&message) {
                    Some(reason) => vec![reason],
                    None => vec![Reason::TaskExecutionFailed],
                };
                (reasons, message)
            }
        };

        if let Err(err) = self
            .store
            .transition_task(task_run_id, TaskStatus::Failed, Some(&error_message))
            .await
        {
            error!(
                "Failed to record FAILED transition for {}: {}",
                task.id(),
                err
            );
        }
        task.status = TaskStatus::Failed;
        info!("{}: RUNNING -> FAILED ({})", task.id(), error_message);
        TaskOutcome {
            status: TaskStatus::Failed,
            reasons,
            error: Some(error_message),
        }
    }

    /// One attempt: re-fetch the document, evaluate rules, reserve stock,
    /// and on a clean pass persist the order and its output.
    async fn attempt(
        &self,
        task: &mut Task,
        task_run_id: u64,
        attempt: u32,
    ) -> std::result::Result<Vec<Reason>, AttemptFailure> {
        self.store
            .set_attempts(task_run_id, attempt)
            .await
            .map_err(AttemptFailure::internal)?;

        // Re-fetch so every attempt observes the current source document.
        let document = self
            .source
            .extract(&task.input_path)
            .await
            .map_err(AttemptFailure::internal)?;

        let mut reasons = rules::evaluate(&document, &self.policy);
        let mut blocking = rules::failure_flags(&reasons);

        // Reservation is keyed by order number; without one there is nothing
        // to reserve against.
        if let Some(order_number) = document.order_number().map(str::to_string) {
            match self
                .pool
                .reserve(&order_number, &document.purchase_order.line_items)
            {
                Ok(ReservationOutcome::Reserved) => {}
                Ok(ReservationOutcome::Insufficient(details)) => {
                    warn!(
                        "{}: stock reservation rejected: {}",
                        task.id(),
                        details.join(", ")
                    );
                    reasons.push(Reason::OutOfStock);
                    blocking.push(Reason::OutOfStock);
                }
                Err(err) => return Err(AttemptFailure::internal(err)),
            }
        }

        if !blocking.is_empty() {
            task.document = Some(document);
            return Err(AttemptFailure::Blocking { reasons, blocking });
        }

        let order_id = self
            .store
            .upsert_order(&document)
            .await
            .map_err(AttemptFailure::internal)?;
        let order_number = document
            .order_number()
            .map(str::to_string)
            .unwrap_or_else(|| task.id());

        if !reasons.is_empty() {
            self.store
                .insert_alert(order_id, &order_number, &reasons, &document)
                .await
                .map_err(AttemptFailure::internal)?;
        }

        self.store
            .set_output(
                task_run_id,
                TaskOutput {
                    order_id,
                    reasons: reasons.clone(),
                    attempts: attempt,
                },
            )
            .await
            .map_err(AttemptFailure::internal)?;
        self.store
            .transition_task(task_run_id, TaskStatus::Success, None)
            .await
            .map_err(AttemptFailure::internal)?;

        task.document = Some(document);
        Ok(reasons)
    }

    async fn write_suite_summaries(&self, root: &Path, result: &RunResult) -> Result<()> {
        let mut suites: Vec<String> = Vec::new();
        for event in &result.events {
            if !suites.contains(&event.suite) {
                suites.push(event.suite.clone());
            }
        }

        for suite_name in suites {
            let events = result.events_for_suite(&suite_name);
            alerts::write_suite_summary(&root.join(&suite_name), &suite_name, &events).await?;
        }
        Ok(())
    }
}

fn setup_failure(task: &mut Task, message: String) -> TaskOutcome {
    task.status = TaskStatus::Failed;
    warn!("{}: FAILED during setup ({})", task.id(), message);
    TaskOutcome {
        status: TaskStatus::Failed,
        reasons: vec![Reason::TaskSetupFailed],
        error: Some(message),
    }
}

/// Map an unexpected error's text onto a structured reason when the content
/// identifies one.
fn classify_error(message: &str) -> Option<Reason> {
    if message.contains("missing_fields") {
        Some(Reason::MissingFields)
    } else if message.contains("out_of_stock") {
        Some(Reason::OutOfStock)
    } else {
        None
    }
}
