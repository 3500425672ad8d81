//! Uniform-invoice stamp detection (統一發票專用章).

use crate::models::invoice::InvoiceRecord;

use super::ExtractionContext;

const STAMP_PHRASES: &[&str] = &["統一發票專用章", "統一發票章", "發票專用章"];

/// Detect the seller stamp phrase. Absence leaves `has_stamp` false with no
/// confidence entry.
pub fn extract_stamp(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    if STAMP_PHRASES.iter().any(|phrase| ctx.text.contains(phrase)) {
        record.has_stamp = true;
        record.mark("has_stamp", 0.7);
    }
    record
}
