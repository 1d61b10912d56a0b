// ABOUTME: Command implementations for the orderflow CLI
// ABOUTME: Handles execution of the run and validate commands

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::config::Config;
use crate::alerts::AlertPolicy;
use crate::engine::{graph, Orchestrator, RunStatus};
use crate::order::JsonOrderSource;
use crate::rules::{comma_joined, RulePolicy};
use crate::stock::InventoryPool;
use crate::store::MemoryStore;

/// Execute a workflow run over the discovered suites
#[allow(clippy::too_many_arguments)]
pub async fn run_workflow(
    suite: Option<String>,
    root: Option<PathBuf>,
    retries: Option<u32>,
    threshold: Option<f64>,
    due_within: Option<i64>,
    task_delay: Option<Duration>,
    config: &Config,
) -> Result<()> {
    let root = root.unwrap_or_else(|| config.orders_root.clone());
    let max_retries = retries.unwrap_or(config.max_retries);
    let policy = RulePolicy {
        amount_threshold: threshold.unwrap_or(config.rules.amount_threshold),
        due_within_days: due_within.unwrap_or(config.rules.due_within_days),
    };
    let task_delay = task_delay.or(config.task_delay);

    info!(
        "Starting workflow run under {} (suite: {})",
        root.display(),
        suite.as_deref().unwrap_or("all")
    );

    let pool = if config.stock.is_empty() {
        InventoryPool::new()
    } else {
        InventoryPool::with_levels(config.stock.iter().map(|(sku, level)| (*sku, *level)))
    };

    let orchestrator = Orchestrator::new(
        Arc::new(JsonOrderSource::new()),
        Arc::new(MemoryStore::new()),
        Arc::new(pool),
    )
    .with_policy(policy)
    .with_alert_policy(AlertPolicy {
        write_unflagged_success: config.alerts.write_unflagged_success,
    })
    .with_max_retries(max_retries)
    .with_task_delay(task_delay);

    let result = orchestrator.run(&root, suite.as_deref()).await?;

    println!(
        "Workflow run {} completed with status: {}",
        result.run_id, result.status
    );
    for event in &result.events {
        let flags = if event.reasons.is_empty() {
            "none".to_string()
        } else {
            comma_joined(&event.reasons)
        };
        println!(
            "  {}/{}: {} (flags: {})",
            event.suite, event.task, event.status, flags
        );
    }
    println!(
        "  {} succeeded, {} failed, {} pending of {} tasks",
        result.summary.successful_tasks,
        result.summary.failed_tasks,
        result.summary.pending_tasks,
        result.summary.total_tasks
    );

    match result.status {
        RunStatus::Success => Ok(()),
        status => Err(anyhow::anyhow!(
            "Workflow run failed with status: {}",
            status
        )),
    }
}

/// Validate discovery and dependency ordering without executing anything
pub async fn validate_workflow(
    suite: Option<String>,
    root: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let root = root.unwrap_or_else(|| config.orders_root.clone());
    info!("Validating task graph under {}", root.display());

    let mut tasks = graph::discover(&root, suite.as_deref())?;
    let task_ids: Vec<String> = tasks.keys().cloned().collect();

    let dependencies = graph::load_dependencies(&root, &task_ids, suite.as_deref())?;
    for (task_id, deps) in dependencies {
        if let Some(task) = tasks.get_mut(&task_id) {
            task.dependencies = deps;
        }
    }

    let order = graph::topo_sort(&tasks)?;

    println!("✓ Task graph is valid");
    println!("  Tasks: {}", order.len());
    println!("  Execution order:");
    for (index, task_id) in order.iter().enumerate() {
        let deps = &tasks[task_id].dependencies;
        if deps.is_empty() {
            println!("    {}. {}", index + 1, task_id);
        } else {
            println!("    {}. {} (after: {})", index + 1, task_id, deps.join(", "));
        }
    }

    info!("Task graph validation completed successfully");
    Ok(())
}
