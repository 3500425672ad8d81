//! Seller address and buyer name extraction.

use crate::models::invoice::InvoiceRecord;

use super::ExtractionContext;
use super::patterns::{ADDRESS_PATTERNS, BUYER_PATTERNS};

const MIN_ADDRESS_CHARS: usize = 5;
const MIN_BUYER_CHARS: usize = 1;

/// Resolve the seller address. Labeled captures run up to the next known
/// boundary keyword; the final pattern keys on city and county prefixes and
/// captures via the whole match.
pub fn extract_address(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    if let Some(address) = first_capture(&ADDRESS_PATTERNS, ctx.text, MIN_ADDRESS_CHARS) {
        record.address = Some(address);
        record.mark("address", 0.7);
    }
    record
}

/// Resolve the buyer name (買受人).
pub fn extract_buyer(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    if let Some(buyer) = first_capture(&BUYER_PATTERNS, ctx.text, MIN_BUYER_CHARS) {
        record.buyer = Some(buyer);
        record.mark("buyer", 0.75);
    }
    record
}

/// First pattern whose trimmed capture meets the length floor. Patterns
/// without a capture group yield their whole match.
fn first_capture(patterns: &[regex::Regex], text: &str, min_chars: usize) -> Option<String> {
    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            let raw = caps
                .get(1)
                .unwrap_or_else(|| caps.get(0).unwrap())
                .as_str()
                .trim();
            if raw.chars().count() >= min_chars {
                return Some(raw.to_string());
            }
        }
    }
    None
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
    fn test_labeled_address_stops_at_boundary() {
        let context = ctx("地址：台北市中正區重慶南路一段122號 電話：02-23456789");
        let record = extract_address(&context, InvoiceRecord::new());
        assert_eq!(
            record.address.as_deref(),
            Some("台北市中正區重慶南路一段122號")
        );
        assert_eq!(record.confidence["address"], 0.7);
    }

    #[test]
    fn test_unlabeled_city_prefix_address() {
        let context = ctx("高雄市苓雅區四維三路2號 營業中");
        let record = extract_address(&context, InvoiceRecord::new());
        assert!(record.address.is_some());
        assert!(record.address.as_deref().unwrap().starts_with("高雄市"));
    }

    #[test]
    fn test_short_address_rejected() {
        let context = ctx("地址：巷3號");
        let record = extract_address(&context, InvoiceRecord::new());
        assert!(record.address.is_none());
        assert!(!record.confidence.contains_key("address"));
    }

    #[test]
    fn test_buyer_stops_at_boundary() {
        let context = ctx("買受人：大同股份有限公司 地址：台北市");
        let record = extract_buyer(&context, InvoiceRecord::new());
        assert_eq!(record.buyer.as_deref(), Some("大同股份有限公司"));
        assert_eq!(record.confidence["buyer"], 0.75);
    }

    #[test]
    fn test_buyer_company_label() {
        let context = ctx("公司名稱：小林商行\n電話：07-1234567");
        let record = extract_buyer(&context, InvoiceRecord::new());
        assert_eq!(record.buyer.as_deref(), Some("小林商行"));
    }

    #[test]
    fn test_empty_buyer_label_rejected() {
        let context = ctx("買受人：\n地址：台北市");
        let record = extract_buyer(&context, InvoiceRecord::new());
        assert!(record.buyer.is_none());
    }
}
