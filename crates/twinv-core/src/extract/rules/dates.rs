//! Date and calendar resolution for Gregorian and minguo (ROC) year forms.
//!
//! OCR text carries dates in competing encodings: 4-digit Gregorian years,
//! 3-digit minguo years (Gregorian − 1911), 2-digit minguo years with the
//! century omitted, and occasionally day-first ordering. Ambiguous numeric
//! triplets are classified under an ordered list of hypotheses, each with its
//! own validator and confidence, and the best validated reading wins.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::invoice::InvoiceRecord;

use super::patterns::{DATE_TRIPLET, DATE_WESTERN, DATE_WESTERN_GLYPH, PERIOD_RANGE};
use super::period::{derive_period_directly, derive_period_from_date};
use super::{ExtractionContext, Scored, pick_best, preceding_window};

/// Markers identifying a Taiwanese uniform invoice; minguo readings of bare
/// numeric triplets are only attempted when one of these occurs.
const TAIWAN_MARKERS: &[&str] = &[
    "統一發票",
    "發票號碼",
    "營業人統一編號",
    "買受人",
    "銷售額",
    "課稅別",
    "民國",
    "中華民國",
    "財政部",
    "稅額",
    "總計",
    "合計",
    "小計",
];

/// A resolved calendar date, Gregorian-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ResolvedDate {
    fn from_parts(year: i32, month: i32, day: i32) -> Self {
        Self {
            year,
            month: month as u32,
            day: day as u32,
        }
    }

    fn formatted(&self) -> String {
        format!("{}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// One reading of an ambiguous numeric triplet `A/B/C`.
struct TripletHypothesis {
    resolve: fn(i32, i32, i32, i32) -> Option<ResolvedDate>,
    confidence: f32,
}

/// Declaration order breaks confidence ties.
const TRIPLET_HYPOTHESES: &[TripletHypothesis] = &[
    TripletHypothesis {
        resolve: read_gregorian_ymd,
        confidence: 0.95,
    },
    TripletHypothesis {
        resolve: read_minguo3_ymd,
        confidence: 0.9,
    },
    TripletHypothesis {
        resolve: read_minguo2_ymd,
        confidence: 0.85,
    },
    TripletHypothesis {
        resolve: read_day_first_minguo2,
        confidence: 0.8,
    },
];

#[derive(Clone, Copy)]
enum FallbackOrder {
    YearFirst,
    DayFirst,
}

lazy_static! {
    /// Generic fallback date forms, tried in order when neither the strict
    /// western tier nor the triplet tier resolves anything.
    static ref DATE_FALLBACKS: Vec<(Regex, FallbackOrder)> = vec![
        (
            Regex::new(r"發票日期[：:]\s*(\d{4})[-/\.年]\s*(\d{1,2})[-/\.月]\s*(\d{1,2})[日號]?").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"日期[：:]\s*(\d{4})[-/\.年]\s*(\d{1,2})[-/\.月]\s*(\d{1,2})[日號]?").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"Date[：:]\s*(\d{4})[-/\.]\s*(\d{1,2})[-/\.]\s*(\d{1,2})").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"(\d{4})[-/\.](\d{1,2})[-/\.](\d{1,2})").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*[日號]").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"(?:中華民國|民國)\s*(\d{1,3})[-/\.年]\s*(\d{1,2})[-/\.月]\s*(\d{1,2})[日號]?").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"(\d{3})[-/\.年]\s*(\d{1,2})[-/\.月]\s*(\d{1,2})[日號]?").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"(\d{2})[-/\.年]\s*(\d{1,2})[-/\.月]\s*(\d{1,2})[日號]?").unwrap(),
            FallbackOrder::YearFirst,
        ),
        (
            Regex::new(r"(\d{1,2})[-/\.]\s*(\d{1,2})[-/\.]\s*(\d{4})").unwrap(),
            FallbackOrder::DayFirst,
        ),
    ];
}

/// Resolve the invoice date and, on success, derive the filing period from
/// its month. On total failure a period is still attempted directly from
/// text.
pub fn extract_date(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    match resolve_date(ctx) {
        Some(resolved) => {
            let formatted = resolved.value.formatted();
            debug!(
                date = %formatted,
                confidence = resolved.confidence,
                "resolved invoice date"
            );
            record.date = Some(formatted);
            record.mark("date", resolved.confidence);
            derive_period_from_date(ctx.text, &mut record, resolved.value.year, resolved.value.month);
        }
        None => derive_period_directly(ctx.text, &mut record),
    }
    record
}

fn resolve_date(ctx: &ExtractionContext<'_>) -> Option<Scored<ResolvedDate>> {
    // Tier 1: explicit 4-digit Gregorian years carry no ambiguity.
    for re in [&*DATE_WESTERN, &*DATE_WESTERN_GLYPH] {
        for caps in re.captures_iter(ctx.text) {
            let m = caps.get(0).unwrap();
            if excluded_as_period(ctx.text, m.start(), m.end()) {
                continue;
            }
            let Some((year, month, day)) = triplet_parts(&caps) else {
                continue;
            };
            if year_plausible(year, ctx.current_year) && month_day_ok(month, day) {
                return Some(Scored::new(
                    ResolvedDate::from_parts(year, month, day),
                    0.95,
                ));
            }
        }
    }

    // Tier 2: ambiguous triplets, minguo readings gated on invoice markers.
    if TAIWAN_MARKERS.iter().any(|kw| ctx.text.contains(kw)) {
        for caps in DATE_TRIPLET.captures_iter(ctx.text) {
            let m = caps.get(0).unwrap();
            if excluded_as_period(ctx.text, m.start(), m.end()) {
                continue;
            }
            let Some((a, b, c)) = triplet_parts(&caps) else {
                continue;
            };

            let candidates: Vec<Scored<ResolvedDate>> = TRIPLET_HYPOTHESES
                .iter()
                .filter_map(|h| {
                    (h.resolve)(a, b, c, ctx.current_year)
                        .map(|date| Scored::new(date, h.confidence))
                })
                .collect();

            if let Some(best) = pick_best(candidates) {
                return Some(best);
            }
        }
    }

    // Tier 3: generic fallback forms with relaxed year bounds.
    for (re, order) in DATE_FALLBACKS.iter() {
        for caps in re.captures_iter(ctx.text) {
            let m = caps.get(0).unwrap();
            if excluded_as_period(ctx.text, m.start(), m.end()) {
                continue;
            }
            let Some((a, b, c)) = triplet_parts(&caps) else {
                continue;
            };

            match order {
                FallbackOrder::YearFirst => {
                    let year = minguo_offset(a);
                    if fallback_year_ok(year) && month_day_ok(b, c) {
                        return Some(Scored::new(ResolvedDate::from_parts(year, b, c), 0.85));
                    }
                }
                FallbackOrder::DayFirst => {
                    // Day/month order first, then the month/day reading.
                    if fallback_year_ok(c) && month_day_ok(b, a) {
                        return Some(Scored::new(ResolvedDate::from_parts(c, b, a), 0.8));
                    }
                    if fallback_year_ok(c) && month_day_ok(a, b) {
                        return Some(Scored::new(ResolvedDate::from_parts(c, a, b), 0.8));
                    }
                }
            }
        }
    }

    None
}

fn triplet_parts(caps: &regex::Captures<'_>) -> Option<(i32, i32, i32)> {
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

fn month_day_ok(month: i32, day: i32) -> bool {
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn year_plausible(year: i32, current_year: i32) -> bool {
    (1900..=current_year + 5).contains(&year)
}

fn fallback_year_ok(year: i32) -> bool {
    (1900..=2100).contains(&year)
}

/// Apply the minguo offset when the value cannot be a Gregorian year.
fn minguo_offset(year: i32) -> i32 {
    if year < 200 { year + 1911 } else { year }
}

fn read_gregorian_ymd(a: i32, b: i32, c: i32, current_year: i32) -> Option<ResolvedDate> {
    (year_plausible(a, current_year) && month_day_ok(b, c))
        .then(|| ResolvedDate::from_parts(a, b, c))
}

fn read_minguo3_ymd(a: i32, b: i32, c: i32, current_year: i32) -> Option<ResolvedDate> {
    if !(100..200).contains(&a) || !month_day_ok(b, c) {
        return None;
    }
    let year = a + 1911;
    year_plausible(year, current_year).then(|| ResolvedDate::from_parts(year, b, c))
}

fn read_minguo2_ymd(a: i32, b: i32, c: i32, current_year: i32) -> Option<ResolvedDate> {
    if !(0..100).contains(&a) || !month_day_ok(b, c) {
        return None;
    }
    let year = infer_minguo_year(a, current_year) + 1911;
    year_plausible(year, current_year).then(|| ResolvedDate::from_parts(year, b, c))
}

fn read_day_first_minguo2(a: i32, b: i32, c: i32, current_year: i32) -> Option<ResolvedDate> {
    if !(1..=31).contains(&a) || !(1..=12).contains(&b) || !(0..100).contains(&c) {
        return None;
    }
    let year = infer_minguo_year(c, current_year) + 1911;
    year_plausible(year, current_year).then(|| ResolvedDate::from_parts(year, b, a))
}

/// Expand a 2-digit minguo year to a full minguo year, choosing the adjacent
/// century that lands within ±20 years of the current minguo year; the bare
/// value is kept when no century does.
fn infer_minguo_year(short: i32, current_year: i32) -> i32 {
    let current_roc = current_year - 1911;
    let base = current_roc / 100 * 100;
    for candidate in [base + short, base + short - 100, base + short + 100] {
        if candidate > 0 && (candidate - current_roc).abs() <= 20 {
            return candidate;
        }
    }
    short
}

/// Reject matches that are really bimonthly period ranges rather than dates:
/// anything adjacent to 期別 or shaped like `11-12月`.
fn excluded_as_period(text: &str, start: usize, end: usize) -> bool {
    if preceding_window(text, start, 10).contains("期別") {
        return true;
    }
    let extended = text[end..]
        .char_indices()
        .nth(2)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    PERIOD_RANGE.is_match(&text[start..extended])
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
    fn test_western_forms_round_trip() {
        for text in ["2024-05-20", "2024/05/20", "2024年5月20日"] {
            let record = extract_date(&ctx(text), InvoiceRecord::new());
            assert_eq!(record.date.as_deref(), Some("2024/05/20"), "input {text}");
            assert!(record.confidence["date"] >= 0.85);
        }
    }

    #[test]
    fn test_minguo_three_digit_year() {
        let record = extract_date(&ctx("統一發票 發票日期 113/05/20"), InvoiceRecord::new());
        assert_eq!(record.date.as_deref(), Some("2024/05/20"));
        assert_eq!(record.confidence["date"], 0.9);
    }

    #[test]
    fn test_minguo_conversion_law() {
        for (roc, gregorian) in [(100, 2011), (110, 2021), (113, 2024)] {
            let text = format!("統一發票 {roc}/01/15");
            let record = extract_date(&ctx(&text), InvoiceRecord::new());
            assert_eq!(
                record.date.as_deref(),
                Some(format!("{gregorian}/01/15").as_str())
            );
        }
    }

    #[test]
    fn test_minguo_two_digit_century_inference() {
        // 99 must land in the adjacent lower century: minguo 99 = 2010.
        let record = extract_date(&ctx("統一發票 99/03/15"), InvoiceRecord::new());
        assert_eq!(record.date.as_deref(), Some("2010/03/15"));
        assert_eq!(record.confidence["date"], 0.85);
    }

    #[test]
    fn test_day_first_reading_when_year_leads_nowhere() {
        // 31 cannot be a plausible 2-digit minguo year here, so the
        // day-first hypothesis is the only validated reading.
        let record = extract_date(&ctx("統一發票 31/12/13"), InvoiceRecord::new());
        assert_eq!(record.date.as_deref(), Some("2024/12/31"));
        assert_eq!(record.confidence["date"], 0.8);
    }

    #[test]
    fn test_fallback_two_digit_without_markers() {
        // No invoice markers, so the triplet tier is skipped and the
        // generic 2-digit fallback applies the plain minguo offset.
        let record = extract_date(&ctx("日期 95/06/10"), InvoiceRecord::new());
        assert_eq!(record.date.as_deref(), Some("2006/06/10"));
        assert_eq!(record.confidence["date"], 0.85);
    }

    #[test]
    fn test_fallback_minguo_glyph_date() {
        let record = extract_date(&ctx("中華民國113年5月20日"), InvoiceRecord::new());
        assert_eq!(record.date.as_deref(), Some("2024/05/20"));
        assert_eq!(record.confidence["date"], 0.85);
    }

    #[test]
    fn test_period_label_is_never_a_date() {
        let record = extract_date(&ctx("發票期別：113/05/20"), InvoiceRecord::new());
        assert!(record.date.is_none());
    }

    #[test]
    fn test_period_range_is_never_a_date() {
        let record = extract_date(&ctx("統一發票 11~12月"), InvoiceRecord::new());
        assert!(record.date.is_none());
        assert_eq!(record.invoice_period.as_deref(), Some("11-12月"));
    }

    #[test]
    fn test_day_bounds_only() {
        // Bounds validation only: day 31 is accepted for every month.
        let record = extract_date(&ctx("2024/02/31"), InvoiceRecord::new());
        assert_eq!(record.date.as_deref(), Some("2024/02/31"));
    }

    #[test]
    fn test_infer_minguo_year() {
        assert_eq!(infer_minguo_year(13, 2025), 113);
        assert_eq!(infer_minguo_year(99, 2025), 99);
        assert_eq!(infer_minguo_year(25, 2025), 125);
        // Fallback to the bare value when no adjacent century is close.
        assert_eq!(infer_minguo_year(60, 2025), 60);
    }

    #[test]
    fn test_idempotent_re_run() {
        let context = ctx("統一發票 113/05/20");
        let once = extract_date(&context, InvoiceRecord::new());
        let twice = extract_date(&context, once.clone());
        assert_eq!(once, twice);
    }
}
