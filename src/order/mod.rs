// ABOUTME: Order document model and order source collaborator
// ABOUTME: Provides the structured purchase-order document and its extraction interface

pub mod document;
pub mod error;
pub mod source;

pub use document::{Amount, Contact, EmailHeaders, LineItem, OrderDocument, PurchaseOrder, ShipTo, Tax, Totals};
pub use error::{Result, SourceError};
pub use source::{JsonOrderSource, OrderSource};
