//! Result persistence: one timestamped JSON snapshot per extraction.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::error::Result;
use crate::models::invoice::InvoiceRecord;

/// Write `record` as pretty-printed UTF-8 JSON under `dir`, creating the
/// directory on demand. The file name carries the extraction timestamp
/// (`invoice_<YYYYMMDDHHMMSS>.json`); the written path is returned.
pub fn save_result(record: &InvoiceRecord, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let path = dir.join(format!("invoice_{stamp}.json"));
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json)?;
    debug!(path = %path.display(), "saved extraction result");
    Ok(path)
}
