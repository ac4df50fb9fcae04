//! Calendar-day extraction from ISO-8601-ish timestamps.

use serde::Serializer;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Extract the calendar day from a timestamp string.
///
/// Accepted shapes (leading/trailing whitespace ignored):
///   - RFC 3339: `2024-03-01T10:15:00Z`, `2024-03-01T10:15:00.250+02:00`
///   - naive date-time with `T` or space: `2024-03-01T10:15:00`, `2024-03-01 10:15:00`
///   - naive date-time without seconds: `2024-03-01 10:15`
///   - bare date: `2024-03-01`
///
/// Offsets are not normalized: the day is the one written in the timestamp.
pub fn parse_day(raw: &str) -> Result<Date, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err("empty timestamp".into());
    }
    if let Ok(odt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(odt.date());
    }
    if let Ok(pdt) = PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")) {
        return Ok(pdt.date());
    }
    if let Ok(pdt) = PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]")) {
        return Ok(pdt.date());
    }
    if let Ok(pdt) = PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]")) {
        return Ok(pdt.date());
    }
    // Fractional seconds on naive timestamps: drop the fraction and retry.
    if let Some((head, frac)) = s.split_once('.') {
        if !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()) {
            return parse_day(head);
        }
    }
    if let Ok(d) = Date::parse(s, format_description!("[year]-[month]-[day]")) {
        return Ok(d);
    }
    Err(format!("unparseable timestamp {:?}", raw))
}

/// `YYYY-MM-DD` rendering used in every artifact.
pub fn format_day(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

/// serde helper so output rows can carry a real `Date`.
pub(crate) fn serialize_day<S: Serializer>(d: &Date, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_day(*d))
}
