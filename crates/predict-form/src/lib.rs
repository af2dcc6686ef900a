//! predict-form — submit an HTML form's numeric fields to a price prediction
//! endpoint and render the scaled result.

pub mod adapter;
pub mod client;
pub mod coerce;
pub mod form;
pub mod render;
pub mod types;

pub use adapter::{AdapterOptions, ConcurrencyPolicy, SubmissionAdapter};
pub use client::{parse_endpoint, HttpPredictionClient, PredictionClient, DEFAULT_ENDPOINT};
pub use coerce::{coerce_entries, parse_float, CoercionPolicy};
pub use form::{FieldList, FormSource, HtmlForm};
pub use render::{render_price, to_fixed_2, MemorySink, ResultSink, PRICE_SCALE};
pub use types::*;
