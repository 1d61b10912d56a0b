// ABOUTME: Persistence collaborator contract for run and task records
// ABOUTME: Defines the CRUD-like store trait plus the record types it manages

pub mod error;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::result::{RunStatus, TaskStatus};
use crate::engine::task::Task;
use crate::order::OrderDocument;
use crate::rules::Reason;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;

/// Output recorded for a completed task run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskOutput {
    pub order_id: u64,
    pub reasons: Vec<Reason>,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub id: u64,
    pub status: RunStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRunRecord {
    pub id: u64,
    pub run_id: u64,
    pub task_id: String,
    pub order_number: Option<String>,
    pub status: TaskStatus,
    pub attempts: u32,
    pub error: Option<String>,
    pub output: Option<TaskOutput>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    pub order_id: u64,
    pub order_number: String,
    pub reasons: Vec<Reason>,
    pub document: OrderDocument,
}

/// Durable store for workflow runs, task runs, orders, and alert rows.
/// The engine drives the state machine; the store just records it. Swappable
/// per deployment; this crate ships an in-memory implementation.
#[async_trait]
pub trait RunStore: Send + Sync {
    async fn create_run(&self) -> Result<u64>;

    async fn transition_run(
        &self,
        run_id: u64,
        status: RunStatus,
        error: Option<&str>,
    ) -> Result<()>;

    async fn create_task_run(&self, run_id: u64, task: &Task) -> Result<u64>;

    async fn set_attempts(&self, task_run_id: u64, attempts: u32) -> Result<()>;

    async fn transition_task(
        &self,
        task_run_id: u64,
        status: TaskStatus,
        error: Option<&str>,
    ) -> Result<()>;

    async fn set_output(&self, task_run_id: u64, output: TaskOutput) -> Result<()>;

    /// Insert or update an order document, keyed by order number. Returns the
    /// stored order id.
    async fn upsert_order(&self, document: &OrderDocument) -> Result<u64>;

    async fn insert_alert(
        &self,
        order_id: u64,
        order_number: &str,
        reasons: &[Reason],
        document: &OrderDocument,
    ) -> Result<()>;
}
