// ABOUTME: Attention rule evaluator for parsed purchase orders
// ABOUTME: Maps an order document to ordered reason codes split into blocking and advisory

pub mod amount;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::order::OrderDocument;

pub use amount::{amount_value, parse_amount};

/// Fixed vocabulary of attention and outcome reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    DueSoon,
    Urgent,
    MissingFields,
    AmountExceedsThreshold,
    OutOfStock,
    WaitingOnDependency,
    WaitingOnUpstream,
    TaskSetupFailed,
    TaskExecutionFailed,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::DueSoon => "due_soon",
            Reason::Urgent => "urgent",
            Reason::MissingFields => "missing_fields",
            Reason::AmountExceedsThreshold => "amount_exceeds_threshold",
            Reason::OutOfStock => "out_of_stock",
            Reason::WaitingOnDependency => "waiting_on_dependency",
            Reason::WaitingOnUpstream => "waiting_on_upstream",
            Reason::TaskSetupFailed => "task_setup_failed",
            Reason::TaskExecutionFailed => "task_execution_failed",
        }
    }

    /// Blocking reasons force the attempt to fail; everything else is advisory.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Reason::MissingFields | Reason::OutOfStock)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds applied by the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulePolicy {
    #[serde(default = "default_amount_threshold")]
    pub amount_threshold: f64,
    #[serde(default = "default_due_within_days")]
    pub due_within_days: i64,
}

fn default_amount_threshold() -> f64 {
    15_000.0
}

fn default_due_within_days() -> i64 {
    7
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            amount_threshold: default_amount_threshold(),
            due_within_days: default_due_within_days(),
        }
    }
}

/// Evaluate attention rules against a document. Pure and deterministic: the
/// due-soon window is anchored to the order's own order date, never the wall
/// clock, so historical documents evaluate identically on every run.
///
/// Matching reasons are appended in a fixed order: due-soon, urgent,
/// missing-fields, amount-threshold.
pub fn evaluate(document: &OrderDocument, policy: &RulePolicy) -> Vec<Reason> {
    let po = &document.purchase_order;
    let mut reasons = Vec::new();

    if let (Some(order_date), Some(due_date)) = (
        parse_date(po.order_date.as_deref()),
        parse_date(po.due_date.as_deref()),
    ) {
        if due_date <= order_date + Duration::days(policy.due_within_days) {
            reasons.push(Reason::DueSoon);
        }
    }

    let subject = document.email.subject.as_deref().unwrap_or("");
    if subject.to_lowercase().contains("urgent") {
        reasons.push(Reason::Urgent);
    }

    let required_present = [
        field_present(po.po_number.as_deref()),
        field_present(po.vendor.as_deref()),
        field_present(po.order_date.as_deref()),
        field_present(po.due_date.as_deref()),
        po.totals
            .total
            .as_ref()
            .map(|total| total.is_present())
            .unwrap_or(false),
    ];
    if required_present.iter().any(|present| !present) {
        reasons.push(Reason::MissingFields);
    }

    if let Some(total) = po.totals.total.as_ref().and_then(amount_value) {
        if total > policy.amount_threshold {
            reasons.push(Reason::AmountExceedsThreshold);
        }
    }

    reasons
}

/// The blocking subset of an evaluation, in evaluation order. A non-empty
/// result means the attempt must fail.
pub fn failure_flags(reasons: &[Reason]) -> Vec<Reason> {
    reasons
        .iter()
        .copied()
        .filter(Reason::is_blocking)
        .collect()
}

/// Comma-joined token rendering used in error strings and summaries.
pub fn comma_joined(reasons: &[Reason]) -> String {
    reasons
        .iter()
        .map(Reason::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn field_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
