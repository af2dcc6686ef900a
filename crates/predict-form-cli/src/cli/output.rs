//! Output mode shared by every subcommand.

use std::sync::atomic::{AtomicBool, Ordering};

static JSON_OUTPUT: AtomicBool = AtomicBool::new(false);

/// Switch machine-readable output on or off.
pub fn set_json(enabled: bool) {
    JSON_OUTPUT.store(enabled, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_OUTPUT.load(Ordering::Relaxed)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!("Failed to serialize output: {e}"),
    }
}
