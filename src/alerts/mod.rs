// ABOUTME: Event sink rendering per-task alerts and per-suite summaries
// ABOUTME: Consumes execution events; persistence of run records lives in the store

pub mod alert;
pub mod error;
pub mod summary;

pub use alert::{write_alert, AlertPolicy};
pub use error::{AlertError, Result};
pub use summary::{render_suite_summary, suite_status, write_suite_summary};
