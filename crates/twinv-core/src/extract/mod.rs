//! Extraction pipeline: a fixed fold of field strategies over one record.

pub mod rules;

use chrono::{Datelike, Local};
use tracing::info;

use crate::models::invoice::{InvoiceRecord, aggregate_confidence};

use rules::{ExtractionContext, FieldStrategy};

/// Strategy order is load-bearing: period derivation reads the resolved
/// date, and the standalone tax-id tier excludes digits already consumed
/// as the invoice number.
const PIPELINE: [FieldStrategy; 10] = [
    rules::number::extract_invoice_number,
    rules::tax_id::extract_seller_tax_id,
    rules::dates::extract_date,
    rules::time::extract_time,
    rules::parties::extract_address,
    rules::parties::extract_buyer,
    rules::amounts::extract_total_amount,
    rules::tax_type::extract_tax_type,
    rules::items::extract_items,
    rules::stamp::extract_stamp,
];

/// Heuristic field extractor for Taiwanese uniform invoices.
///
/// One extractor is reusable across documents; each [`extract_all`] call owns
/// an independent record, so concurrent calls need no coordination.
///
/// [`extract_all`]: InvoiceExtractor::extract_all
///
/// # Example
///
/// ```
/// use twinv_core::InvoiceExtractor;
///
/// let extractor = InvoiceExtractor::new().with_current_year(2025);
/// let record = extractor.extract_all("統一發票 AB12345678 總計：NT$1,250");
/// assert_eq!(record.invoice_number.as_deref(), Some("AB12345678"));
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceExtractor {
    current_year: i32,
    validate_tax_id: bool,
}

impl InvoiceExtractor {
    /// Create an extractor anchored to the local calendar year.
    pub fn new() -> Self {
        Self {
            current_year: Local::now().year(),
            validate_tax_id: true,
        }
    }

    /// Override the reference year used for date plausibility bounds and
    /// 2-digit minguo century inference. Useful for reproducible tests and
    /// for re-processing archived documents.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Toggle the 8-digit format check on seller tax id candidates.
    pub fn with_tax_id_validation(mut self, enabled: bool) -> Self {
        self.validate_tax_id = enabled;
        self
    }

    /// Run every field strategy over `text` and return the populated record.
    ///
    /// Never fails: malformed or empty input yields a record with all fields
    /// unset and an overall confidence of 0.
    pub fn extract_all(&self, text: &str) -> InvoiceRecord {
        let ctx = ExtractionContext {
            text,
            current_year: self.current_year,
            validate_tax_id: self.validate_tax_id,
        };

        let mut record = PIPELINE
            .iter()
            .fold(InvoiceRecord::new(), |record, strategy| {
                strategy(&ctx, record)
            });
        record.overall_confidence = aggregate_confidence(&record.confidence);

        info!(
            resolved_fields = record.confidence.len(),
            overall_confidence = record.overall_confidence,
            "extraction finished"
        );
        record
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::invoice::TaxType;

    fn extractor() -> InvoiceExtractor {
        InvoiceExtractor::new().with_current_year(2025)
    }

    #[test]
    fn test_full_invoice_scenario() {
        let text = "統一發票 AB12345678\n發票日期：113/05/20\n總計：NT$1,250\n統一編號：12345678";
        let record = extractor().extract_all(text);

        assert_eq!(record.invoice_number.as_deref(), Some("AB12345678"));
        assert_eq!(record.seller_tax_id.as_deref(), Some("12345678"));
        assert_eq!(record.date.as_deref(), Some("2024/05/20"));
        assert_eq!(record.invoice_period.as_deref(), Some("民國113年05-06月"));
        assert_eq!(record.total_amount.as_deref(), Some("1250.00"));
        assert!(record.overall_confidence > 0.8);
    }

    #[test]
    fn test_yearless_period_only() {
        let record = extractor().extract_all("本期 3-4月 發票");
        assert_eq!(record.invoice_period.as_deref(), Some("03-04月"));
        assert!(record.date.is_none());
        let confidence = record.confidence["invoice_period"];
        assert!((0.8..=0.9).contains(&confidence));
    }

    #[test]
    fn test_empty_input_degrades_gracefully() {
        let record = extractor().extract_all("");
        assert_eq!(record, InvoiceRecord::new());
        assert_eq!(record.overall_confidence, 0.0);
        assert!(record.items.is_empty());
        assert!(!record.has_stamp);
    }

    #[test]
    fn test_noise_input_never_panics() {
        let record = extractor().extract_all("!!!@@@###\n\n   \t唔");
        assert_eq!(record.overall_confidence, 0.0);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let text = "統一發票 AB12345678 發票日期：113/05/20 總計：NT$1,250";
        let extractor = extractor();
        assert_eq!(extractor.extract_all(text), extractor.extract_all(text));
    }

    #[test]
    fn test_confidence_entries_match_resolved_fields() {
        let text = "統一發票 AB12345678\n課稅別：應稅\n統一發票專用章";
        let record = extractor().extract_all(text);

        assert!(record.confidence.contains_key("invoice_number"));
        assert!(record.confidence.contains_key("tax_type"));
        assert!(record.confidence.contains_key("has_stamp"));
        assert!(!record.confidence.contains_key("date"));
        assert!(!record.confidence.contains_key("total_amount"));
        assert_eq!(record.tax_type, Some(TaxType::Taxable));
    }

    #[test]
    fn test_tax_id_validation_disabled_keeps_labeled_candidates() {
        let text = "統一編號：12345678";
        let strict = extractor().extract_all(text);
        let loose = extractor()
            .with_tax_id_validation(false)
            .extract_all(text);
        assert_eq!(strict.seller_tax_id, loose.seller_tax_id);
    }

    #[test]
    fn test_receipt_with_items_and_time() {
        let text = "品名  數量  單價  金額\n蘋果  2  30  60\n合計 60元整\n時間：14:30";
        let record = extractor().extract_all(text);

        assert_eq!(record.items.len(), 1);
        assert_eq!(record.time.as_deref(), Some("14:30"));
        assert_eq!(record.total_amount.as_deref(), Some("60.00"));
        assert_eq!(record.confidence["total_amount"], 1.0);
    }
}
