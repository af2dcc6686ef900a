//! Display formatting and the result sink.

use std::sync::{Arc, Mutex};

/// Multiplier applied to the raw prediction before display.
pub const PRICE_SCALE: f64 = 100_000.0;

/// Prefix of every rendered result.
pub const RESULT_PREFIX: &str = "Predicted Price: $";

/// Receives the rendered result text. Stands in for the page's result element.
pub trait ResultSink: Send + Sync {
    /// Replace the displayed text.
    fn write_text(&self, text: &str);
}

/// Build the display string for a raw `predicted_price`.
pub fn render_price(predicted_price: f64) -> String {
    format!("{RESULT_PREFIX}{}", to_fixed_2(predicted_price * PRICE_SCALE))
}

/// Format with exactly two decimals.
///
/// Exact ties round away from zero, `-0` prints as `0.00`, NaN prints as
/// `NaN`, and magnitudes of 1e21 and above (including infinities) fall back
/// to exponent notation such as `1e+21`.
pub fn to_fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 {
        return exponent_form(value);
    }

    // -0.0 is not < 0.0, so negative zero prints unsigned.
    let sign = if value < 0.0 { "-" } else { "" };

    // The only binary fractions sitting exactly on a .xx5 boundary are odd
    // multiples of 1/8.
    let eighths = magnitude * 8.0;
    let digits = if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        round_half_up(&format!("{magnitude:.3}"))
    } else {
        format!("{magnitude:.2}")
    };

    format!("{sign}{digits}")
}

fn exponent_form(value: f64) -> String {
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}

/// Drop the final `5` of an exact three-decimal string and round up.
fn round_half_up(three_decimals: &str) -> String {
    let mut digits: Vec<u8> = three_decimals.as_bytes().to_vec();
    digits.pop();

    let mut carry = true;
    for d in digits.iter_mut().rev() {
        if !carry {
            break;
        }
        match *d {
            b'.' => continue,
            b'9' => *d = b'0',
            _ => {
                *d += 1;
                carry = false;
            }
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    String::from_utf8_lossy(&digits).into_owned()
}

#[derive(Debug, Default)]
struct MemorySinkState {
    text: Option<String>,
    writes: usize,
}

/// In-memory result element. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<MemorySinkState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last text written, if any.
    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    /// Number of writes so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySinkState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ResultSink for MemorySink {
    fn write_text(&self, text: &str) {
        let mut state = self.lock();
        state.text = Some(text.to_string());
        state.writes += 1;
    }
}
