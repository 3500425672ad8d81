//! Core library for Taiwanese uniform-invoice (統一發票) field extraction.
//!
//! This crate turns raw, noisy OCR text into a structured [`InvoiceRecord`]
//! with per-field confidence scores:
//! - three-tier invoice number and seller tax id resolution
//! - Gregorian / minguo (ROC) calendar disambiguation and bimonthly filing
//!   period derivation
//! - ranked selection among competing total-amount candidates
//! - time, address, buyer, tax category, line item, and stamp heuristics
//!
//! Extraction never fails: fields that cannot be resolved stay unset and the
//! overall confidence degrades accordingly.

pub mod error;
pub mod extract;
pub mod models;
pub mod storage;

pub use error::{Result, TwinvError};
pub use extract::InvoiceExtractor;
pub use models::invoice::{InvoiceRecord, LineItem, TaxType, aggregate_confidence};
pub use storage::save_result;
