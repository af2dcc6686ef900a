//! `predict-form payload` — show the JSON body a submit would send.

use anyhow::Result;
use predict_form::{coerce_entries, CoercionPolicy, FormPayload, FormSource};

use crate::cli::output;

/// Coerce the form into the body a submit would send.
pub fn build(form: &dyn FormSource, coercion: CoercionPolicy) -> Result<FormPayload> {
    Ok(coerce_entries(&form.entries(), coercion)?)
}

/// Run the payload command. Non-numeric fields show as `null` and are
/// reported through the log.
pub fn run(form: &dyn FormSource, coercion: CoercionPolicy) -> Result<()> {
    let payload = build(form, coercion)?;
    output::print_json(&payload);
    Ok(())
}
