//! Seller tax identifier (統一編號) extraction and validation.

use crate::models::invoice::InvoiceRecord;

use super::ExtractionContext;
use super::patterns::{TAX_ID_KEYWORD, TAX_ID_STANDALONE};

/// Resolve the seller tax id: labeled forms first, then any bare eight-digit
/// run that is not part of the already-resolved invoice number.
pub fn extract_seller_tax_id(
    ctx: &ExtractionContext<'_>,
    mut record: InvoiceRecord,
) -> InvoiceRecord {
    for pattern in TAX_ID_KEYWORD.iter() {
        for caps in pattern.captures_iter(ctx.text) {
            let tax_id = &caps[1];
            if !ctx.validate_tax_id || validate_tax_id(tax_id) {
                record.seller_tax_id = Some(tax_id.to_string());
                record.mark("seller_tax_id", 0.9);
                return record;
            }
        }
    }

    for caps in TAX_ID_STANDALONE.captures_iter(ctx.text) {
        let tax_id = &caps[1];
        if let Some(number) = &record.invoice_number {
            if number.contains(tax_id) {
                continue;
            }
        }
        if !ctx.validate_tax_id || validate_tax_id(tax_id) {
            record.seller_tax_id = Some(tax_id.to_string());
            record.mark("seller_tax_id", 0.7);
            return record;
        }
    }

    record
}

/// Format check: exactly eight ASCII digits.
pub fn validate_tax_id(tax_id: &str) -> bool {
    tax_id.len() == 8 && tax_id.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(text: &str) -> ExtractionContext<'_> {
        ExtractionContext {
            text,
            current_year: 2025,
            validate_tax_id: true,
        }
    }

    #[test]
    fn test_labeled_tax_id() {
        let context = ctx("賣方資訊 統一編號：12345678 電話 02-12345678");
        let record = extract_seller_tax_id(&context, InvoiceRecord::new());
        assert_eq!(record.seller_tax_id.as_deref(), Some("12345678"));
        assert_eq!(record.confidence["seller_tax_id"], 0.9);
    }

    #[test]
    fn test_labeled_short_form() {
        let context = ctx("統編: 87654321");
        let record = extract_seller_tax_id(&context, InvoiceRecord::new());
        assert_eq!(record.seller_tax_id.as_deref(), Some("87654321"));
    }

    #[test]
    fn test_standalone_skips_invoice_number_digits() {
        let mut seeded = InvoiceRecord::new();
        seeded.invoice_number = Some("12345678".to_string());

        let context = ctx("編號 12345678 以及 87654321 在此");
        let record = extract_seller_tax_id(&context, seeded);
        assert_eq!(record.seller_tax_id.as_deref(), Some("87654321"));
        assert_eq!(record.confidence["seller_tax_id"], 0.7);
    }

    #[test]
    fn test_no_eight_digit_run() {
        let context = ctx("金額 1234567 共七位");
        let record = extract_seller_tax_id(&context, InvoiceRecord::new());
        assert!(record.seller_tax_id.is_none());
    }

    #[test]
    fn test_validate_tax_id() {
        assert!(validate_tax_id("12345678"));
        assert!(!validate_tax_id("1234567"));
        assert!(!validate_tax_id("123456789"));
        assert!(!validate_tax_id("1234567a"));
    }
}
