//! Browser-style conversions of raw feature properties.
//!
//! Feed properties reach the popup and the marker style exactly as a map
//! script would see them: concatenated into text, multiplied into a
//! radius, compared against band thresholds, or handed to a date
//! constructor. These functions reproduce those conversions so a `null`,
//! a numeric string, or an absent member renders the same way it would in
//! the browser.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

/// Text of an absent property.
pub const UNDEFINED: &str = "undefined";

/// Largest absolute time value a date can represent, in milliseconds.
pub const MAX_TIME_MILLIS: f64 = 8.64e15;

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// String conversion, as in `"Magnitude: " + value`.
pub fn to_text(value: Option<&Value>) -> String {
    value.map_or_else(|| UNDEFINED.to_owned(), value_text)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        // Array elements that are null print as empty.
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map_or_else(|| "NaN".to_owned(), float_text)
    } else {
        n.to_string()
    }
}

/// Shortest round-trip text of a number, switching to exponent notation
/// outside `[1e-6, 1e21)`.
pub fn float_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        let text = if n.is_sign_negative() { "-Infinity" } else { "Infinity" };
        return text.to_owned();
    }
    if n == 0.0 {
        // Covers -0 as well.
        return "0".to_owned();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Numeric conversion, as in `value * 25000` or `value > 4`.
///
/// Absent is `NaN`, `null` is `0`, booleans are `0`/`1`, and strings are
/// parsed as decimal or `0x`/`0o`/`0b` literals with surrounding
/// whitespace ignored. Objects are `NaN`.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Object(_)) => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => string_number(s),
        Some(array @ Value::Array(_)) => string_number(&value_text(array)),
    }
}

fn string_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return radix_number(digits, radix);
        }
    }

    // Rust also accepts `inf` and `nan` spellings; a browser does not.
    if text
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

fn radix_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
        })
        .unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Epoch milliseconds of `new Date(value)`, or `None` for an invalid date.
///
/// Numbers are truncated toward zero, `null` is the epoch, and strings
/// are parsed as RFC 3339, RFC 2822, or an ISO date or date-time (read as
/// UTC).
pub fn to_epoch_millis(value: Option<&Value>) -> Option<i64> {
    let millis = match value? {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => {
            if let Some(exact) = n.as_i64() {
                return (exact.unsigned_abs() <= 8_640_000_000_000_000).then_some(exact);
            }
            n.as_f64()?
        }
        Value::String(s) => return parse_date(s),
        other => return parse_date(&value_text(other)),
    };
    time_clip(millis)
}

#[allow(clippy::cast_possible_truncation)]
fn time_clip(millis: f64) -> Option<i64> {
    if !millis.is_finite() || millis.abs() > MAX_TIME_MILLIS {
        return None;
    }
    // In range: |millis| <= 8.64e15 fits an i64 exactly after truncation.
    Some(millis.trunc() as i64)
}

fn parse_date(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
