//! Invoice number extraction (two uppercase letters + eight digits).

use tracing::debug;

use crate::models::invoice::InvoiceRecord;

use super::ExtractionContext;
use super::patterns::{INVOICE_NUMBER_KEYWORD, INVOICE_NUMBER_LOOSE, INVOICE_NUMBER_STRICT};

/// Resolve the invoice number through three fallback tiers: strict canonical
/// form, loose form with stray separators, then keyword-anchored forms. The
/// first tier that yields any match wins.
pub fn extract_invoice_number(
    ctx: &ExtractionContext<'_>,
    mut record: InvoiceRecord,
) -> InvoiceRecord {
    if let Some(m) = INVOICE_NUMBER_STRICT.find(ctx.text) {
        debug!(number = m.as_str(), "invoice number matched strict form");
        record.invoice_number = Some(m.as_str().to_string());
        record.mark("invoice_number", 0.95);
        return record;
    }

    if let Some(m) = INVOICE_NUMBER_LOOSE.find(ctx.text) {
        let number: String = m
            .as_str()
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();
        record.invoice_number = Some(number);
        record.mark("invoice_number", 0.7);
        return record;
    }

    for pattern in INVOICE_NUMBER_KEYWORD.iter() {
        if let Some(caps) = pattern.captures(ctx.text) {
            let number: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
            record.invoice_number = Some(number);
            record.mark("invoice_number", 0.85);
            return record;
        }
    }

    record
}
