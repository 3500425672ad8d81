//! Structured record produced by one extraction pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result of extracting one uniform invoice from OCR text.
///
/// Every field starts unset and is written by at most one strategy. A field
/// has a `confidence` entry exactly when it carries a value; absent fields
/// serialize as explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number, canonical form: 2 uppercase letters + 8 digits.
    pub invoice_number: Option<String>,

    /// Seller tax identifier (統一編號), exactly 8 digits.
    pub seller_tax_id: Option<String>,

    /// Bimonthly filing period, optionally prefixed with a minguo year
    /// (e.g. `民國113年05-06月`).
    pub invoice_period: Option<String>,

    /// Invoice date, Gregorian-normalized `YYYY/MM/DD`.
    pub date: Option<String>,

    /// Transaction time, 24-hour `HH:MM`.
    pub time: Option<String>,

    /// Seller address.
    pub address: Option<String>,

    /// Buyer name (買受人).
    pub buyer: Option<String>,

    /// Line items in document order; may be empty.
    pub items: Vec<LineItem>,

    /// Total amount as a decimal string with 2 fraction digits.
    pub total_amount: Option<String>,

    /// Business-tax category (課稅別).
    pub tax_type: Option<TaxType>,

    /// Whether a uniform-invoice stamp phrase was found.
    pub has_stamp: bool,

    /// Per-field confidence scores, one entry per resolved field only.
    pub confidence: HashMap<String, f32>,

    /// Mean of all per-field confidence scores, 0 when none resolved.
    pub overall_confidence: f32,
}

impl InvoiceRecord {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a per-field confidence score.
    pub fn mark(&mut self, field: &str, score: f32) {
        self.confidence.insert(field.to_string(), score);
    }
}

/// One line item. Columns are kept as raw OCR cells in document order;
/// table cells are frequently non-numeric noise, so no numeric parsing is
/// forced on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description (品名).
    pub name: String,

    /// Quantity cell, possibly empty.
    pub quantity: String,

    /// Unit-price cell, possibly empty.
    pub unit_price: String,

    /// Amount cell (last column of the row).
    pub amount: String,
}

/// Taiwanese business-tax category (課稅別).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// 應稅, subject to the 5% business tax.
    Taxable,
    /// 零稅率, zero-rated (exports).
    ZeroRated,
    /// 免稅, exempt.
    Exempt,
}

impl TaxType {
    /// Display name as printed on invoices.
    pub fn display(&self) -> &'static str {
        match self {
            TaxType::Taxable => "應稅",
            TaxType::ZeroRated => "零稅率",
            TaxType::Exempt => "免稅",
        }
    }
}

/// Mean of the per-field confidence scores, 0 when the map is empty.
pub fn aggregate_confidence(confidence: &HashMap<String, f32>) -> f32 {
    if confidence.is_empty() {
        return 0.0;
    }
    confidence.values().sum::<f32>() / confidence.len() as f32
}
