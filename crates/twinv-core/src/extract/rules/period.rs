//! Bimonthly filing-period derivation.
//!
//! Taiwanese invoices are filed in fixed two-month windows. The period is
//! derived from the resolved invoice date when one exists, otherwise read
//! directly from period phrases in the text. A period carrying a minguo year
//! is never replaced by a yearless one.

use crate::models::invoice::InvoiceRecord;

use super::patterns::{PERIOD_BARE, PERIOD_CN_NUMERAL, PERIOD_MINGUO, PERIOD_SINGLE_MONTH};

const PERIOD_LABELS: [&str; 6] = [
    "01-02月",
    "03-04月",
    "05-06月",
    "07-08月",
    "09-10月",
    "11-12月",
];

/// The fixed bimonthly label covering `month`, for months 1 through 12.
pub(crate) fn period_label(month: u32) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(PERIOD_LABELS[(month as usize - 1) / 2])
    } else {
        None
    }
}

/// Derive the period from an already-resolved date. The minguo year prefix
/// uses the exact phrase 中華民國 when the source text carries it.
pub(crate) fn derive_period_from_date(
    text: &str,
    record: &mut InvoiceRecord,
    year: i32,
    month: u32,
) {
    let Some(label) = period_label(month) else {
        return;
    };
    let minguo = year - 1911;
    let value = if minguo > 0 {
        format!("{}{minguo}年{label}", year_prefix(text))
    } else {
        label.to_string()
    };
    record.invoice_period = Some(value);
    record.mark("invoice_period", 0.9);
}

/// Read a period phrase straight from text, tried in decreasing specificity:
/// minguo-year ranges, Chinese-numeral ranges, bare ranges, single months.
pub(crate) fn derive_period_directly(text: &str, record: &mut InvoiceRecord) {
    if has_year_bearing_period(record) {
        return;
    }

    if let Some(caps) = PERIOD_MINGUO.captures(text) {
        if let (Ok(year), Ok(month)) = (caps[1].parse::<i32>(), caps[2].parse::<u32>()) {
            if let Some(label) = period_label(month) {
                record.invoice_period = Some(format!("{}{year}年{label}", year_prefix(text)));
                record.mark("invoice_period", 0.9);
                return;
            }
        }
    }

    if let Some(caps) = PERIOD_CN_NUMERAL.captures(text) {
        if let (Some(year), Some(month)) = (cn_numeral(&caps[1]), cn_numeral(&caps[2])) {
            if let Some(label) = period_label(month) {
                record.invoice_period = Some(format!("{}{year}年{label}", year_prefix(text)));
                record.mark("invoice_period", 0.85);
                return;
            }
        }
    }

    if let Some(caps) = PERIOD_BARE.captures(text) {
        if let Ok(month) = caps[1].parse::<u32>() {
            if let Some(label) = period_label(month) {
                record.invoice_period = Some(label.to_string());
                record.mark("invoice_period", 0.8);
                return;
            }
        }
    }

    if let Some(caps) = PERIOD_SINGLE_MONTH.captures(text) {
        if let Ok(month) = caps[1].parse::<u32>() {
            if let Some(label) = period_label(month) {
                record.invoice_period = Some(label.to_string());
                record.mark("invoice_period", 0.75);
            }
        }
    }
}

fn has_year_bearing_period(record: &InvoiceRecord) -> bool {
    record
        .invoice_period
        .as_deref()
        .is_some_and(|p| p.contains('年'))
}

fn year_prefix(text: &str) -> &'static str {
    if text.contains("中華民國") {
        "中華民國"
    } else {
        "民國"
    }
}

/// Chinese numerals as they appear in period phrases: months compose around
/// 十 (十一 = 11), years are written digit by digit (一一三 = 113).
fn cn_numeral(s: &str) -> Option<u32> {
    let digits: Vec<u32> = s.chars().map(cn_digit).collect::<Option<Vec<_>>>()?;
    if !s.contains('十') {
        return Some(digits.iter().fold(0, |acc, d| acc * 10 + d));
    }
    match digits.as_slice() {
        [10] => Some(10),
        [10, d] => Some(10 + d),
        [d, 10] => Some(d * 10),
        [d, 10, e] => Some(d * 10 + e),
        _ => None,
    }
}

fn cn_digit(c: char) -> Option<u32> {
    match c {
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        '十' => Some(10),
        _ => None,
    }
}
