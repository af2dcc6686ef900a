//! Best-effort numeric coercion of raw form text.
//!
//! Form values are read the way a browser script's `parseFloat` reads them:
//! leading whitespace is skipped and the longest decimal prefix wins, so
//! `"42px"` is 42 and `"abc"` is NaN. What happens to NaN afterwards is up
//! to the [`CoercionPolicy`].

use std::str::FromStr;

use serde_json::Value;

use crate::types::{FormEntry, FormPayload, PredictError, PredictResult};

/// What to do with a form value that does not parse as a number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CoercionPolicy {
    /// Send NaN through unchanged (serialized as JSON `null`).
    #[default]
    Propagate,
    /// Fail the submission before any request is made.
    Reject,
    /// Substitute a fixed value.
    Default(f64),
}

impl FromStr for CoercionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "propagate" => Ok(Self::Propagate),
            "reject" => Ok(Self::Reject),
            other => match other.strip_prefix("default=") {
                Some(v) => v
                    .trim()
                    .parse::<f64>()
                    .map(Self::Default)
                    .map_err(|e| format!("invalid default value {v:?}: {e}")),
                None => Err(format!(
                    "unknown coercion policy {other:?} (expected propagate, reject, or default=<number>)"
                )),
            },
        }
    }
}

/// Collapse raw entries (last value wins per name) and coerce each value.
pub fn coerce_entries(entries: &[FormEntry], policy: CoercionPolicy) -> PredictResult<FormPayload> {
    let mut collapsed: Vec<(&str, &str)> = Vec::with_capacity(entries.len());
    for (name, raw) in entries {
        match collapsed.iter_mut().find(|(n, _)| *n == name.as_str()) {
            Some(slot) => slot.1 = raw.as_str(),
            None => collapsed.push((name.as_str(), raw.as_str())),
        }
    }

    let mut payload = FormPayload::new();
    for (name, raw) in collapsed {
        let mut value = parse_float(raw);
        if value.is_nan() {
            match policy {
                CoercionPolicy::Propagate => {
                    tracing::warn!(field = name, raw, "non-numeric form value sent as NaN");
                }
                CoercionPolicy::Reject => {
                    return Err(PredictError::InvalidField {
                        name: name.to_string(),
                        raw: raw.to_string(),
                    });
                }
                CoercionPolicy::Default(fallback) => {
                    tracing::debug!(field = name, raw, fallback, "non-numeric form value replaced");
                    value = fallback;
                }
            }
        }
        payload.insert(name, value);
    }
    Ok(payload)
}

/// Parse the longest numeric prefix of `text`, or NaN.
pub fn parse_float(text: &str) -> f64 {
    let trimmed = text.trim_start_matches(is_script_whitespace);

    let (negative, unsigned) = split_sign(trimmed);
    if unsigned.starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let len = decimal_prefix_len(trimmed);
    if len == 0 {
        return f64::NAN;
    }
    trimmed[..len].parse().unwrap_or(f64::NAN)
}

/// Convert a JSON value to a number the way script arithmetic would.
///
/// Arrays and objects read as NaN.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Whole-string numeric reading: blank is 0, trailing garbage is NaN.
fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(is_script_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return radix_digits_to_number(digits, radix);
        }
    }

    let (negative, unsigned) = split_sign(trimmed);
    if unsigned == "Infinity" {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    if decimal_prefix_len(trimmed) == trimmed.len() {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Unsigned digits in `radix`, accumulated in f64 so long literals lose
/// precision instead of overflowing. Signs and empty digit runs are NaN.
fn radix_digits_to_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    value
}

/// Script whitespace: Unicode White_Space minus NEL, plus the BOM.
fn is_script_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

/// Byte length of the leading `[sign] digits [. digits] [e [sign] digits]`.
fn decimal_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < b.len() && b[i] == b'.' {
        let mut j = i + 1;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - i - 1;
        if int_digits > 0 || frac_digits > 0 {
            i = j;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}
