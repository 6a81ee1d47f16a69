//! Spoken date phrases resolved against a reference calendar day
//!
//! Works entirely in `NaiveDate`, so the resulting value names the same
//! calendar day regardless of the runtime's UTC offset.

use chrono::{Datelike, NaiveDate};

use crate::patterns::{MONTH_NAMES, SPOKEN_DATE};

/// Resolve "hari ini", "kemarin" or "tanggal D <bulan> [Y]" against the
/// reference date. Anything else, including impossible dates like
/// "31 februari", yields `None` and the caller keeps its current date.
pub fn parse_spoken_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let text = text.to_lowercase();

    if text.contains("kemarin") {
        return reference.pred_opt();
    }
    if text.contains("hari ini") {
        return Some(reference);
    }

    let caps = SPOKEN_DATE.captures(&text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(&caps[2]))? as u32
        + 1;
    let year: i32 = match caps.get(3) {
        Some(year) => year.as_str().parse().ok()?,
        None => reference.year(),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
