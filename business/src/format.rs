//! Display formatting for table cells.
//!
//! All functions take the raw cell text and never fail: anything that cannot
//! be interpreted is shown as-is.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone as _};

/// Naive datetime layouts accepted besides RFC 3339. Interpreted in the display offset.
const LOCAL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Interpret a raw cell as an instant and move it into `offset`.
///
/// RFC 3339 values carry their own offset. A bare `YYYY-MM-DD` is midnight UTC,
/// other naive layouts are wall-clock time in `offset`.
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let utc_midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
        return Some(utc_midnight.with_timezone(&offset));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return offset
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .single();
    }

    LOCAL_DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .and_then(|naive| offset.from_local_datetime(&naive).single())
    })
}

/// `DD/MM/YYYY`; unparseable input is returned unchanged.
pub fn format_date(raw: &str, offset: FixedOffset) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_timestamp(raw, offset) {
        Some(dt) => dt.format("%d/%m/%Y").to_string(),
        None => raw.to_owned(),
    }
}

/// `DD/MM/YYYY HH:MM`; unparseable input is returned unchanged.
pub fn format_datetime(raw: &str, offset: FixedOffset) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_timestamp(raw, offset) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => raw.to_owned(),
    }
}

/// Indonesian-locale number: `.` groups thousands, `,` separates up to three
/// fraction digits.
pub fn format_number(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => group_id_locale(n),
        _ => raw.to_owned(),
    }
}

/// `Rp ` followed by the grouped amount.
pub fn format_rupiah(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => format!("Rp {}", group_id_locale(n)),
        _ => raw.to_owned(),
    }
}

fn group_id_locale(n: f64) -> String {
    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    let mut out = String::new();
    let is_zero = grouped.chars().all(|c| c == '0' || c == '.') && frac_part.is_empty();
    if n.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Shorten `text` to at most `max_chars` characters, ending with `…` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
