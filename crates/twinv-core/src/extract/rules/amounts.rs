//! Total-amount candidate ranking.
//!
//! Every money-like match in the text becomes a candidate. Candidates next to
//! a disqualifying keyword (subtotals, unit prices, tax, change) or outside
//! the plausible value range are dropped; the rest are scored from a 0.6 base
//! plus corroborating context signals, and the highest score wins. Ties keep
//! the earliest pattern in list order.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::invoice::InvoiceRecord;

use super::{ExtractionContext, preceding_window};

const MAX_PLAUSIBLE_AMOUNT: i64 = 1_000_000;

/// Keywords that mark a number as something other than the grand total.
const DISQUALIFIERS: &[&str] = &["小計", "單價", "折扣", "稅額", "税額", "找零", "餘額"];

lazy_static! {
    /// Amount surfaces in priority order: labeled totals first, then cash
    /// lines, then bare currency-marked or 元-suffixed numbers.
    static ref AMOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"總計[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"合計[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"總金額[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"含稅總額[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"總額[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"應收金額[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"應付金額[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"現金收訖[:：]?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"現金[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"(?i)TOTAL[:：]?\s*NT?\$?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"NT\$\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"TWD\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"([\d,]+(?:\.\d+)?)\s*元整").unwrap(),
        Regex::new(r"([\d,]+(?:\.\d+)?)\s*元").unwrap(),
    ];
}

/// Rank all amount candidates and keep the winner as a 2-fraction-digit
/// decimal string.
pub fn extract_total_amount(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    let mut best: Option<(Decimal, f32)> = None;

    for pattern in AMOUNT_PATTERNS.iter() {
        for caps in pattern.captures_iter(ctx.text) {
            let group = caps.get(1).unwrap();
            let Some(value) = parse_amount(group.as_str()) else {
                continue;
            };
            if value <= Decimal::ZERO || value > Decimal::from(MAX_PLAUSIBLE_AMOUNT) {
                continue;
            }
            if disqualified(preceding_window(ctx.text, group.start(), 10)) {
                continue;
            }

            let confidence = score(ctx.text, group.start(), group.end());
            debug!(value = %value, confidence, "amount candidate");
            match best {
                Some((_, current)) if confidence <= current => {}
                _ => best = Some((value, confidence)),
            }
        }
    }

    if let Some((value, confidence)) = best {
        record.total_amount = Some(format!("{value:.2}"));
        record.mark("total_amount", confidence);
    }
    record
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.replace(',', "").parse().ok()
}

/// 含稅總額 occurrences are stripped from the window before the 稅額 check
/// so an inclusive-total label is not read as a tax line.
fn disqualified(window: &str) -> bool {
    let cleaned = window.replace("含稅總額", "").replace("含税總額", "");
    DISQUALIFIERS.iter().any(|kw| cleaned.contains(kw))
}

/// Any amount-labeling keyword; earns the generic bonus when no literal NT$
/// sits right before the number.
const AMOUNT_KEYWORDS: &[&str] = &["總計", "合計", "現金", "總金額", "總額"];

fn score(text: &str, start: usize, end: usize) -> f32 {
    let before = preceding_window(text, start, 10);
    let mut confidence: f32 = 0.6;

    if before.contains("總計") || before.contains("合計") {
        confidence += 0.2;
    }
    if before.contains("現金") {
        confidence += 0.2;
    }
    if text[end..].trim_start().starts_with("元整") {
        confidence += 0.1;
    }
    if preceding_window(text, start, 5).contains("NT$") {
        confidence += 0.1;
    } else if AMOUNT_KEYWORDS.iter().any(|kw| before.contains(kw)) {
        confidence += 0.15;
    }

    confidence.min(1.0)
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
    fn test_labeled_total_with_currency_mark() {
        let record = extract_total_amount(&ctx("總計：NT$1,250"), InvoiceRecord::new());
        assert_eq!(record.total_amount.as_deref(), Some("1250.00"));
        assert!((record.confidence["total_amount"] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_subtotal_disqualified() {
        let record = extract_total_amount(
            &ctx("小計：500元\n總計：1000元"),
            InvoiceRecord::new(),
        );
        assert_eq!(record.total_amount.as_deref(), Some("1000.00"));
        assert!((record.confidence["total_amount"] - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_labeled_total_outranks_cash_currency_line() {
        // 總計 earns both the total and the generic keyword bonus (0.95);
        // the cash line with a literal NT$ stops at 0.9.
        let record = extract_total_amount(
            &ctx("總計：1000\n現金：NT$500"),
            InvoiceRecord::new(),
        );
        assert_eq!(record.total_amount.as_deref(), Some("1000.00"));
        assert!((record.confidence["total_amount"] - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_higher_score_wins_regardless_of_position() {
        // The bare 元 amount appears first in text but the cash line carries
        // the stronger signal.
        let record = extract_total_amount(
            &ctx("金額 800元\n現金：1,000"),
            InvoiceRecord::new(),
        );
        assert_eq!(record.total_amount.as_deref(), Some("1000.00"));
    }

    #[test]
    fn test_round_sum_suffix_bonus_caps_at_one() {
        let record = extract_total_amount(&ctx("合計 1000元整"), InvoiceRecord::new());
        assert_eq!(record.total_amount.as_deref(), Some("1000.00"));
        assert_eq!(record.confidence["total_amount"], 1.0);
    }

    #[test]
    fn test_value_above_limit_rejected() {
        let record = extract_total_amount(&ctx("總計：1,500,000"), InvoiceRecord::new());
        assert!(record.total_amount.is_none());
    }

    #[test]
    fn test_zero_rejected() {
        let record = extract_total_amount(&ctx("總計：0"), InvoiceRecord::new());
        assert!(record.total_amount.is_none());
        assert!(!record.confidence.contains_key("total_amount"));
    }

    #[test]
    fn test_tax_line_never_selected() {
        let record = extract_total_amount(&ctx("稅額：50元"), InvoiceRecord::new());
        assert!(record.total_amount.is_none());
    }

    #[test]
    fn test_inclusive_total_label_not_mistaken_for_tax() {
        let record = extract_total_amount(&ctx("含稅總額：2,100"), InvoiceRecord::new());
        assert_eq!(record.total_amount.as_deref(), Some("2100.00"));
    }
}
