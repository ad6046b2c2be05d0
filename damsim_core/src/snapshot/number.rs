//! Tolerant number reading for user-entered and stored values

use serde_json::Value;

/// Parse user text into a number, falling back on anything unusable.
///
/// Thousands separators are dropped and surrounding whitespace ignored.
/// Empty text and non-finite results yield `fallback`.
pub fn parse_number(text: &str, fallback: f64) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return fallback;
    }
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// Read a stored value as a number.
///
/// Numbers pass through when finite, strings go through [`parse_number`],
/// everything else (missing, null, bool, arrays, objects) yields `fallback`.
pub fn read_number(value: Option<&Value>, fallback: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => f,
            _ => fallback,
        },
        Some(Value::String(s)) => parse_number(s, fallback),
        _ => fallback,
    }
}
