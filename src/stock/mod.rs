// ABOUTME: Stock reservation service guarding the shared inventory pool
// ABOUTME: Provides SKU inference and delta-based, all-or-nothing reservations

pub mod error;
pub mod pool;
pub mod sku;

pub use error::{Result, StockError};
pub use pool::{InventoryPool, ReservationOutcome};
pub use sku::Sku;
