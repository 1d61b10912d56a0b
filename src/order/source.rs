// ABOUTME: Order source collaborator trait and the JSON file implementation
// ABOUTME: Extracts structured order documents from task input references

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::document::OrderDocument;
use super::error::{Result, SourceError};

/// Produces a structured order document for a task's input reference.
/// Swappable per deployment; the engine only sees this interface.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn extract(&self, input: &Path) -> Result<OrderDocument>;
}

/// Reads an already-structured order document from a JSON file. Upstream
/// extraction (text or PDF layout analysis) happens outside this crate.
#[derive(Debug, Default)]
pub struct JsonOrderSource;

impl JsonOrderSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderSource for JsonOrderSource {
    async fn extract(&self, input: &Path) -> Result<OrderDocument> {
        if !input.exists() {
            return Err(SourceError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(input).await?;
        let document: OrderDocument = serde_json::from_str(&raw)?;

        debug!(
            "Extracted order document from {} (order number: {:?})",
            input.display(),
            document.order_number()
        );

        Ok(document)
    }
}
