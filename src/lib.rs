// ABOUTME: Main library module for the orderflow workflow engine
// ABOUTME: Exports all core modules and provides the public API

pub mod alerts;
pub mod cli;
pub mod engine;
pub mod order;
pub mod rules;
pub mod stock;
pub mod store;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use engine::{ExecutionEvent, Orchestrator, RunResult, RunStatus, Task, TaskStatus};
pub use order::{JsonOrderSource, OrderDocument, OrderSource};
pub use rules::{evaluate, failure_flags, Reason, RulePolicy};
pub use stock::{InventoryPool, ReservationOutcome, Sku};
pub use store::{MemoryStore, RunStore};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
