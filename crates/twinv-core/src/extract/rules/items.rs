//! Line-item extraction.
//!
//! Table mode first: find a header row, take every line until the totals
//! section, and split it into columns on runs of whitespace. When no table
//! header exists, fall back to generic "name number number" row patterns
//! over the whole text.

use crate::models::invoice::{InvoiceRecord, LineItem};

use super::ExtractionContext;
use super::patterns::{COLUMN_SPLIT, ITEM_ROW_3, ITEM_ROW_4};

const HEADER_KEYWORDS: &[&str] = &[
    "品名", "項目", "數量", "單價", "金額", "Item", "Qty", "Price", "Amount",
];

const TOTAL_KEYWORDS: &[&str] = &["總計", "合計", "小計", "總額", "Total", "TOTAL"];

/// Row captures that are clearly not merchandise.
const NOISE_KEYWORDS: &[&str] = &[
    "總計", "合計", "小計", "發票", "統一", "電話", "地址", "NT$",
];

/// Resolve line items in document order; an empty result is not an error and
/// leaves the items list empty with no confidence entry.
pub fn extract_items(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    let mut items = table_items(ctx.text);
    if items.is_empty() {
        items = pattern_items(ctx.text);
    }
    if !items.is_empty() {
        record.items = items;
        record.mark("items", 0.6);
    }
    record
}

fn table_items(text: &str) -> Vec<LineItem> {
    let lines: Vec<&str> = text.lines().collect();
    let Some(header) = lines.iter().position(|line| is_header_row(line)) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for line in &lines[header + 1..] {
        if TOTAL_KEYWORDS.iter().any(|kw| line.contains(kw)) {
            break;
        }
        let cols: Vec<&str> = COLUMN_SPLIT
            .split(line.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if cols.len() < 2 || !plausible_name(cols[0]) {
            continue;
        }
        items.push(match cols.as_slice() {
            [name, amount] => LineItem {
                name: (*name).to_string(),
                quantity: String::new(),
                unit_price: String::new(),
                amount: (*amount).to_string(),
            },
            [name, quantity, amount] => LineItem {
                name: (*name).to_string(),
                quantity: (*quantity).to_string(),
                unit_price: String::new(),
                amount: (*amount).to_string(),
            },
            // The amount is always the final column, however many sit between.
            [name, quantity, unit_price, .., amount] => LineItem {
                name: (*name).to_string(),
                quantity: (*quantity).to_string(),
                unit_price: (*unit_price).to_string(),
                amount: (*amount).to_string(),
            },
            _ => continue,
        });
    }
    items
}

/// A header row names at least two column-vocabulary words.
fn is_header_row(line: &str) -> bool {
    HEADER_KEYWORDS.iter().filter(|kw| line.contains(*kw)).count() >= 2
}

fn pattern_items(text: &str) -> Vec<LineItem> {
    let four: Vec<LineItem> = ITEM_ROW_4
        .captures_iter(text)
        .filter(|caps| plausible_name(&caps[1]))
        .map(|caps| LineItem {
            name: caps[1].to_string(),
            quantity: caps[2].to_string(),
            unit_price: caps[3].to_string(),
            amount: caps[4].to_string(),
        })
        .collect();
    if !four.is_empty() {
        return four;
    }

    ITEM_ROW_3
        .captures_iter(text)
        .filter(|caps| plausible_name(&caps[1]))
        .map(|caps| LineItem {
            name: caps[1].to_string(),
            quantity: caps[2].to_string(),
            unit_price: String::new(),
            amount: caps[3].to_string(),
        })
        .collect()
}

fn plausible_name(name: &str) -> bool {
    if name.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return false;
    }
    !NOISE_KEYWORDS.iter().any(|kw| name.contains(kw))
}
