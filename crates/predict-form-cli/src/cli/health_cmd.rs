//! `predict-form health` — probe the backend's health endpoint.

use anyhow::{Context, Result};

use crate::cli::output;
use crate::cli::submit_cmd::build_client;

/// Run the health command.
pub async fn run(endpoint: &str, timeout_ms: Option<u64>) -> Result<()> {
    let client = build_client(endpoint, timeout_ms)?;
    let url = client.health_url()?;
    let health = client
        .health()
        .await
        .with_context(|| format!("Health check failed for {url}"))?;

    if output::is_json() {
        output::print_json(&health);
    } else {
        println!("{url}: {}", health.status);
        if let Some(model) = &health.model_type {
            println!("  Model: {model}");
        }
    }
    Ok(())
}
