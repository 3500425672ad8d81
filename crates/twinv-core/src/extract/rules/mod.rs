//! Rule-based field strategies for Taiwanese uniform invoices.
//!
//! Each strategy is a pure step of the extraction fold: it reads the shared
//! [`ExtractionContext`], writes at most one field (plus its confidence) into
//! the record, and passes the record on. Strategies may read fields resolved
//! by earlier pipeline steps but never re-inspect consumed text.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod number;
pub mod parties;
pub mod patterns;
pub mod period;
pub mod stamp;
pub mod tax_id;
pub mod tax_type;
pub mod time;

use crate::models::invoice::InvoiceRecord;

/// Immutable per-document context shared by all strategies.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    /// Raw OCR text.
    pub text: &'a str,
    /// Reference year for date plausibility bounds.
    pub current_year: i32,
    /// Whether seller tax ids must pass format validation.
    pub validate_tax_id: bool,
}

/// A field strategy: one pure step of the extraction fold.
pub type FieldStrategy = fn(&ExtractionContext<'_>, InvoiceRecord) -> InvoiceRecord;

/// A candidate value with its heuristic confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub value: T,
    pub confidence: f32,
}

impl<T> Scored<T> {
    pub fn new(value: T, confidence: f32) -> Self {
        Self { value, confidence }
    }
}

/// Pick the highest-confidence candidate; earlier entries win ties.
pub fn pick_best<T>(candidates: Vec<Scored<T>>) -> Option<Scored<T>> {
    let mut best: Option<Scored<T>> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.confidence <= current.confidence => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// The last `n` characters before byte offset `at` in `text`.
pub(crate) fn preceding_window(text: &str, at: usize, n: usize) -> &str {
    let head = &text[..at];
    let start = head
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(head.len());
    &head[start..]
}
