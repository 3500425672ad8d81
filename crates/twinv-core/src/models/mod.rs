//! Data models for extraction results.

pub mod invoice;
