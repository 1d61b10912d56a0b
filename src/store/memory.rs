// ABOUTME: In-memory implementation of the run store collaborator
// ABOUTME: Keeps run, task-run, order, and alert records behind a shared RwLock

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{Result, StoreError};
use super::{AlertRecord, RunRecord, RunStore, TaskOutput, TaskRunRecord};
use crate::engine::result::{RunStatus, TaskStatus};
use crate::engine::task::Task;
use crate::order::OrderDocument;
use crate::rules::Reason;

#[derive(Debug, Default)]
struct StoreState {
    next_id: u64,
    runs: HashMap<u64, RunRecord>,
    task_runs: HashMap<u64, TaskRunRecord>,
    // Orders keyed by order number for upsert semantics.
    orders: HashMap<String, (u64, OrderDocument)>,
    alerts: Vec<AlertRecord>,
}

impl StoreState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store. All records live behind one RwLock; clones share the
/// same state, so tests can inspect what the engine recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run(&self, run_id: u64) -> Option<RunRecord> {
        self.state.read().await.runs.get(&run_id).cloned()
    }

    pub async fn task_runs_for(&self, run_id: u64) -> Vec<TaskRunRecord> {
        let state = self.state.read().await;
        let mut records: Vec<TaskRunRecord> = state
            .task_runs
            .values()
            .filter(|record| record.run_id == run_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }

    pub async fn task_run(&self, task_run_id: u64) -> Option<TaskRunRecord> {
        self.state.read().await.task_runs.get(&task_run_id).cloned()
    }

    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    pub async fn alerts(&self) -> Vec<AlertRecord> {
        self.state.read().await.alerts.clone()
    }
}

#[async_trait]
impl RunStore for MemoryStore {
    async fn create_run(&self) -> Result<u64> {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let now = Utc::now();
        state.runs.insert(
            id,
            RunRecord {
                id,
                status: RunStatus::Pending,
                error: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn transition_run(
        &self,
        run_id: u64,
        status: RunStatus,
        error: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state.runs.get_mut(&run_id).ok_or(StoreError::NotFound {
            entity: "workflow run",
            id: run_id,
        })?;
        record.status = status;
        record.error = error.map(str::to_string);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn create_task_run(&self, run_id: u64, task: &Task) -> Result<u64> {
        let mut state = self.state.write().await;
        if !state.runs.contains_key(&run_id) {
            return Err(StoreError::NotFound {
                entity: "workflow run",
                id: run_id,
            });
        }
        let id = state.next_id();
        let now = Utc::now();
        state.task_runs.insert(
            id,
            TaskRunRecord {
                id,
                run_id,
                task_id: task.id(),
                order_number: task.order_number().map(str::to_string),
                status: TaskStatus::Pending,
                attempts: 0,
                error: None,
                output: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn set_attempts(&self, task_run_id: u64, attempts: u32) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state
            .task_runs
            .get_mut(&task_run_id)
            .ok_or(StoreError::NotFound {
                entity: "task run",
                id: task_run_id,
            })?;
        record.attempts = attempts;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn transition_task(
        &self,
        task_run_id: u64,
        status: TaskStatus,
        error: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state
            .task_runs
            .get_mut(&task_run_id)
            .ok_or(StoreError::NotFound {
                entity: "task run",
                id: task_run_id,
            })?;
        record.status = status;
        record.error = error.map(str::to_string);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn set_output(&self, task_run_id: u64, output: TaskOutput) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state
            .task_runs
            .get_mut(&task_run_id)
            .ok_or(StoreError::NotFound {
                entity: "task run",
                id: task_run_id,
            })?;
        record.output = Some(output);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn upsert_order(&self, document: &OrderDocument) -> Result<u64> {
        let mut state = self.state.write().await;
        if let Some(number) = document.order_number() {
            if let Some((existing_id, stored)) = state.orders.get_mut(number) {
                let id = *existing_id;
                *stored = document.clone();
                return Ok(id);
            }
            let id = state.next_id();
            state.orders.insert(number.to_string(), (id, document.clone()));
            Ok(id)
        } else {
            let id = state.next_id();
            state.orders.insert(format!("order-{}", id), (id, document.clone()));
            Ok(id)
        }
    }

    async fn insert_alert(
        &self,
        order_id: u64,
        order_number: &str,
        reasons: &[Reason],
        document: &OrderDocument,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.alerts.push(AlertRecord {
            order_id,
            order_number: order_number.to_string(),
            reasons: reasons.to_vec(),
            document: document.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn task(suite: &str, name: &str) -> Task {
        Task::new(
            suite.to_string(),
            name.to_string(),
            PathBuf::from(format!("/tmp/{}/input/{}.json", suite, name)),
        )
    }

    #[tokio::test]
    async fn test_run_lifecycle() {
        let store = MemoryStore::new();
        let run_id = store.create_run().await.unwrap();

        let record = store.run(run_id).await.unwrap();
        assert_eq!(record.status, RunStatus::Pending);

        store
            .transition_run(run_id, RunStatus::Running, None)
            .await
            .unwrap();
        store
            .transition_run(run_id, RunStatus::Failed, Some("one_or_more_tasks_failed"))
            .await
            .unwrap();

        let record = store.run(run_id).await.unwrap();
        assert_eq!(record.status, RunStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("one_or_more_tasks_failed"));
    }

    #[tokio::test]
    async fn test_task_run_records() {
        let store = MemoryStore::new();
        let run_id = store.create_run().await.unwrap();
        let task = task("demo", "sample");

        let task_run_id = store.create_task_run(run_id, &task).await.unwrap();
        store.set_attempts(task_run_id, 2).await.unwrap();
        store
            .transition_task(task_run_id, TaskStatus::Success, None)
            .await
            .unwrap();
        store
            .set_output(
                task_run_id,
                TaskOutput {
                    order_id: 7,
                    reasons: vec![Reason::DueSoon],
                    attempts: 2,
                },
            )
            .await
            .unwrap();

        let records = store.task_runs_for(run_id).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task_id, "demo/sample");
        assert_eq!(records[0].attempts, 2);
        assert_eq!(records[0].status, TaskStatus::Success);
        assert_eq!(records[0].output.as_ref().unwrap().order_id, 7);
    }

    #[tokio::test]
    async fn test_upsert_order_is_keyed_by_number() {
        let store = MemoryStore::new();

        let mut document = OrderDocument::default();
        document.purchase_order.po_number = Some("PO-1".to_string());
        document.purchase_order.vendor = Some("Acme".to_string());

        let first = store.upsert_order(&document).await.unwrap();

        document.purchase_order.vendor = Some("Globex".to_string());
        let second = store.upsert_order(&document).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_error() {
        let store = MemoryStore::new();
        let result = store.set_attempts(99, 1).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
