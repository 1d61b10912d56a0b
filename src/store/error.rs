// ABOUTME: Error types for persistence collaborator operations
// ABOUTME: Covers missing records and backend failures behind the store trait

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Store backend failure: {message}")]
    Backend { message: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
