// ABOUTME: Error types for workflow engine operations
// ABOUTME: Graph construction failures are fatal; task-level failures stay inside the run

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Suite '{suite}' not found under {root}")]
    SuiteNotFound { suite: String, root: PathBuf },

    #[error("No order input files found under {root}")]
    NoTasks { root: PathBuf },

    #[error("Circular dependency detected among tasks: {tasks:?}")]
    CircularDependency { tasks: Vec<String> },

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Failed to read dependency file {path}: {source}")]
    DependencyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dependency file {path}: {source}")]
    DependencyFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to scan {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Alert sink error: {0}")]
    Alert(#[from] crate::alerts::AlertError),
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
