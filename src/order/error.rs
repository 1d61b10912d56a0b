// ABOUTME: Error types for order document extraction
// ABOUTME: Defines failures surfaced by order source implementations

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Order input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read order input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed order document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
