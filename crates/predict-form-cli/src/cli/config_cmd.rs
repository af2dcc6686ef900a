//! `predict-form config` — show the resolved configuration.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::cli::output;

/// Run the config command.
pub fn run(config_path: &Path, endpoint: &str) -> Result<()> {
    let exists = config_path.exists();
    if output::is_json() {
        output::print_json(&json!({
            "config_file": config_path.display().to_string(),
            "config_file_exists": exists,
            "endpoint": endpoint,
        }));
    } else {
        let marker = if exists { "" } else { " (not found, using defaults)" };
        println!("Config file: {}{marker}", config_path.display());
        println!("Endpoint:    {endpoint}");
    }
    Ok(())
}
