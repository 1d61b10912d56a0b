// ABOUTME: Error types for the alert and summary sink
// ABOUTME: File writing and payload serialization failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Failed to write alert output: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to serialize alert payload: {0}")]
    SerializeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlertError>;
