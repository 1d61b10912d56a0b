// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Builds suite directories with order documents and dependency files

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for one order document fixture.
#[derive(Debug, Clone)]
pub struct OrderFixture {
    pub subject: String,
    pub po_number: Option<String>,
    pub vendor: Option<String>,
    pub order_date: Option<String>,
    pub due_date: Option<String>,
    pub total: Option<Value>,
    pub line_items: Vec<(String, i64)>,
}

impl OrderFixture {
    /// A complete order with no attention flags under default policy.
    pub fn clean(po_number: &str) -> Self {
        Self {
            subject: "Purchase Order".to_string(),
            po_number: Some(po_number.to_string()),
            vendor: Some("Acme Packaging".to_string()),
            order_date: Some("2025-06-01".to_string()),
            due_date: Some("2025-09-01".to_string()),
            total: Some(json!(100.0)),
            line_items: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn with_order_date(mut self, date: &str) -> Self {
        self.order_date = Some(date.to_string());
        self
    }

    pub fn with_due_date(mut self, date: &str) -> Self {
        self.due_date = Some(date.to_string());
        self
    }

    pub fn without_vendor(mut self) -> Self {
        self.vendor = None;
        self
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(json!(total));
        self
    }

    pub fn with_total_text(mut self, total: &str) -> Self {
        self.total = Some(json!(total));
        self
    }

    pub fn with_line_item(mut self, description: &str, qty: i64) -> Self {
        self.line_items.push((description.to_string(), qty));
        self
    }

    pub fn to_json(&self) -> Value {
        let line_items: Vec<Value> = self
            .line_items
            .iter()
            .enumerate()
            .map(|(index, (description, qty))| {
                json!({
                    "item_no": index + 1,
                    "description": description,
                    "qty": qty,
                    "unit_price": 1.0,
                    "total": *qty as f64,
                })
            })
            .collect();

        json!({
            "email": {"subject": self.subject},
            "purchase_order": {
                "po_number": self.po_number,
                "vendor": self.vendor,
                "order_date": self.order_date,
                "due_date": self.due_date,
                "line_items": line_items,
                "totals": {"total": self.total},
            }
        })
    }
}

/// A temporary orders root with suite directories.
pub struct WorkflowFixture {
    temp_dir: TempDir,
}

impl WorkflowFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn add_order(&self, suite: &str, name: &str, fixture: &OrderFixture) {
        self.add_raw_order(
            suite,
            name,
            &serde_json::to_string_pretty(&fixture.to_json()).expect("serialize fixture"),
        );
    }

    pub fn add_raw_order(&self, suite: &str, name: &str, body: &str) {
        let input_dir = self.root().join(suite).join("input");
        fs::create_dir_all(&input_dir).expect("create input dir");
        fs::write(input_dir.join(format!("{}.json", name)), body).expect("write order input");
    }

    pub fn write_global_dependencies(&self, dependencies: Value) {
        fs::write(
            self.root().join("dependencies.json"),
            serde_json::to_string_pretty(&dependencies).expect("serialize dependencies"),
        )
        .expect("write dependencies file");
    }

    pub fn write_suite_dependencies(&self, suite: &str, dependencies: Value) {
        let suite_dir = self.root().join(suite);
        fs::create_dir_all(&suite_dir).expect("create suite dir");
        fs::write(
            suite_dir.join("dependencies.json"),
            serde_json::to_string_pretty(&dependencies).expect("serialize dependencies"),
        )
        .expect("write suite dependencies file");
    }

    pub fn alert_path(&self, suite: &str, task: &str) -> PathBuf {
        self.root()
            .join(suite)
            .join("alerts")
            .join(format!("{}.alerts.json", task))
    }

    pub fn summary_path(&self, suite: &str) -> PathBuf {
        self.root()
            .join(suite)
            .join("response")
            .join(format!("{}.summary.txt", suite))
    }

    pub fn read_alert(&self, suite: &str, task: &str) -> Value {
        let raw = fs::read_to_string(self.alert_path(suite, task)).expect("read alert file");
        serde_json::from_str(&raw).expect("parse alert file")
    }

    pub fn read_summary(&self, suite: &str) -> String {
        fs::read_to_string(self.summary_path(suite)).expect("read summary file")
    }
}
