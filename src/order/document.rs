// ABOUTME: Structured order document types produced by the order source
// ABOUTME: Read-only to the engine; mirrors the upstream extraction output shape

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderDocument {
    #[serde(default)]
    pub email: EmailHeaders,
    #[serde(default)]
    pub message_intro: Vec<String>,
    #[serde(default)]
    pub purchase_order: PurchaseOrder,
}

/// Header block carried over from the originating message. Senders vary, so
/// anything beyond the common fields lands in the flattened catch-all map.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmailHeaders {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PurchaseOrder {
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub ship_to: ShipTo,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShipTo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address_lines: Vec<String>,
    #[serde(default)]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineItem {
    #[serde(default)]
    pub item_no: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Totals {
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Tax,
    #[serde(default)]
    pub shipping: Option<f64>,
    #[serde(default)]
    pub total: Option<Amount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tax {
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub raw_lines: Vec<String>,
}

/// Computed order total. Upstream extractors emit either a JSON number or a
/// formatted string such as "$12,345.67".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Whether the field carries a value at all (presence, not validity).
    pub fn is_present(&self) -> bool {
        match self {
            Amount::Number(_) => true,
            Amount::Text(text) => !text.trim().is_empty(),
        }
    }
}

impl OrderDocument {
    /// The order number, if present and non-empty.
    pub fn order_number(&self) -> Option<&str> {
        self.purchase_order
            .po_number
            .as_deref()
            .map(str::trim)
            .filter(|number| !number.is_empty())
    }
}
