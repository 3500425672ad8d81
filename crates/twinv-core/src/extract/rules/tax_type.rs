//! Business-tax category classification (課稅別).

use crate::models::invoice::InvoiceRecord;
use crate::models::invoice::TaxType;

use super::ExtractionContext;
use super::patterns::TAX_AMOUNT;

/// Category keyword sets, simplified glyph variants included. Check order
/// matters: 免營業稅 must classify as exempt before 營業稅 implies taxable.
const CATEGORIES: &[(TaxType, &[&str])] = &[
    (TaxType::ZeroRated, &["零稅率", "零税率", "零稅"]),
    (TaxType::Exempt, &["免稅", "免税", "免營業稅"]),
    (TaxType::Taxable, &["應稅", "應税", "应税", "營業稅", "加值型"]),
];

/// Classify the tax category by keyword membership. Without a category
/// keyword, a labeled tax-amount line still implies a taxable invoice at
/// reduced confidence.
pub fn extract_tax_type(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    for (tax_type, keywords) in CATEGORIES {
        if keywords.iter().any(|kw| ctx.text.contains(kw)) {
            record.tax_type = Some(*tax_type);
            record.mark("tax_type", 0.7);
            return record;
        }
    }

    if TAX_AMOUNT.is_match(ctx.text) {
        record.tax_type = Some(TaxType::Taxable);
        record.mark("tax_type", 0.6);
    }
    record
}
