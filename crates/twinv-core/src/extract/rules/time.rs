//! Transaction-time extraction, normalized to 24-hour `HH:MM`.

use crate::models::invoice::InvoiceRecord;

use super::ExtractionContext;
use super::patterns::{TIME_AMPM, TIME_GLYPH, TIME_HMS, TIME_LABELED, TIME_LABELED_EN};

/// Resolve the transaction time: labeled forms, then `HH:MM:SS`, then glyph
/// time, then bare or AM/PM-suffixed `HH:MM`. Any match scores 0.8.
pub fn extract_time(ctx: &ExtractionContext<'_>, mut record: InvoiceRecord) -> InvoiceRecord {
    for re in [&*TIME_LABELED, &*TIME_LABELED_EN, &*TIME_HMS, &*TIME_GLYPH] {
        for caps in re.captures_iter(ctx.text) {
            if let Some(time) = read_hm(&caps[1], &caps[2]) {
                record.time = Some(time);
                record.mark("time", 0.8);
                return record;
            }
        }
    }

    for caps in TIME_AMPM.captures_iter(ctx.text) {
        let suffix = caps.get(3).map(|m| m.as_str().to_ascii_uppercase());
        if let Some(time) = read_hm_12(&caps[1], &caps[2], suffix.as_deref()) {
            record.time = Some(time);
            record.mark("time", 0.8);
            return record;
        }
    }

    record
}

fn read_hm(hour: &str, minute: &str) -> Option<String> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    (hour <= 23 && minute <= 59).then(|| format!("{hour:02}:{minute:02}"))
}

fn read_hm_12(hour: &str, minute: &str, suffix: Option<&str>) -> Option<String> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if minute > 59 {
        return None;
    }
    let hour = match suffix {
        Some("PM") if hour < 12 => hour + 12,
        Some("AM") if hour == 12 => 0,
        Some(_) if hour > 12 => return None,
        None if hour > 23 => return None,
        _ => hour,
    };
    Some(format!("{hour:02}:{minute:02}"))
}
