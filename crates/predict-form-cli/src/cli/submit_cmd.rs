//! `predict-form submit` — send the form and print the rendered prediction.

use anyhow::Result;
use predict_form::{
    AdapterOptions, CoercionPolicy, FormSource, HttpPredictionClient, ResultSink,
    SubmissionAdapter,
};

use crate::cli::output;

/// Result element backed by stdout. Silent in JSON mode, where the whole
/// submission is printed instead.
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn write_text(&self, text: &str) {
        if !output::is_json() {
            println!("{text}");
        }
    }
}

/// Build the HTTP client, optionally with a request timeout.
pub fn build_client(endpoint: &str, timeout_ms: Option<u64>) -> Result<HttpPredictionClient> {
    let client = match timeout_ms {
        Some(ms) => HttpPredictionClient::with_timeout(endpoint, ms)?,
        None => HttpPredictionClient::new(endpoint)?,
    };
    Ok(client)
}

/// Run the submit command.
pub async fn run(
    endpoint: &str,
    form: &dyn FormSource,
    coercion: CoercionPolicy,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let client = build_client(endpoint, timeout_ms)?;
    tracing::info!("Submitting form to {}", client.endpoint());

    let adapter = SubmissionAdapter::new(client, ConsoleSink).with_options(AdapterOptions {
        coercion,
        ..AdapterOptions::default()
    });
    let submission = adapter.submit(form).await?;

    if output::is_json() {
        output::print_json(&submission);
    }
    Ok(())
}
