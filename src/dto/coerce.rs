//! Field coercion and sanitizing for loosely typed JSON request bodies.
//!
//! Clients send numbers as JSON numbers or as strings, and may leave fields
//! out entirely. Everything here is total: a value that cannot be read becomes
//! the empty string or zero, and the validation step decides whether that is
//! acceptable.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;

/// Parse a request body, treating an empty or malformed body as "no fields".
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

pub fn string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

pub fn decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => {
            Decimal::from_str(leading_number(s.trim(), true)).unwrap_or(Decimal::ZERO)
        }
        Some(Value::Bool(true)) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

pub fn integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_number(s.trim(), false).parse().unwrap_or(0),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

/// The longest prefix of `s` that reads as a number: optional sign, digits
/// and, when `fraction` is set, a decimal point followed by more digits.
fn leading_number(s: &str, fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if fraction && end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 || end > digits_start {
            end = frac_end;
        }
    }
    if end == digits_start {
        return "";
    }
    s[..end].trim_end_matches('.')
}

/// Trim, drop escaping backslashes and HTML-escape a user supplied string so
/// stored text can never carry markup.
pub fn sanitize(input: &str) -> String {
    let unslashed = strip_slashes(input.trim());
    let mut out = String::with_capacity(unslashed.len());
    for c in unslashed.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
