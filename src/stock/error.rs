// ABOUTME: Error types for the stock reservation service
// ABOUTME: Internal service failures, distinct from ordinary insufficiency outcomes

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("Inventory unit {unit} is not tracked by this pool")]
    UnknownUnit { unit: String },

    #[error("Inventory lock poisoned for unit {unit}")]
    LockPoisoned { unit: String },
}

pub type Result<T> = std::result::Result<T, StockError>;
