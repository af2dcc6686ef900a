//! Core data types for form payloads, prediction responses, and submissions.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::coerce::to_number;

/// Name of the response attribute carrying the prediction.
pub const PREDICTED_PRICE_FIELD: &str = "predicted_price";

/// One `(name, raw text)` pair as collected from a form, in document order.
pub type FormEntry = (String, String);

/// Coerced form fields, one numeric value per field name.
///
/// Inserting an existing name replaces its value but keeps the position of
/// the first occurrence. Serializes as a JSON object in insertion order;
/// non-finite values are written as `null`.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    fields: Vec<(String, f64)>,
}

impl FormPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Return the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Names of fields whose value is NaN.
    pub fn nan_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, v)| v.is_nan())
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

impl Serialize for FormPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The JSON object returned by the prediction endpoint.
///
/// No schema is enforced beyond "is an object"; [`predicted_price`] reads
/// the one attribute the adapter cares about.
///
/// [`predicted_price`]: PredictionResponse::predicted_price
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionResponse {
    fields: serde_json::Map<String, Value>,
}

impl PredictionResponse {
    /// Get a raw attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `predicted_price` attribute converted to a number.
    ///
    /// `null` reads as 0, booleans as 0/1, numeric strings as their value,
    /// anything else as NaN.
    pub fn predicted_price(&self) -> PredictResult<f64> {
        self.fields
            .get(PREDICTED_PRICE_FIELD)
            .map(to_number)
            .ok_or_else(|| PredictError::MissingExpectedField(PREDICTED_PRICE_FIELD.to_string()))
    }
}

impl From<serde_json::Map<String, Value>> for PredictionResponse {
    fn from(fields: serde_json::Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Body of the backend's `GET /health` probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_type: Option<String>,
}

/// Adapter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Outcome of one completed submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub payload: FormPayload,
    pub response: PredictionResponse,
    /// Text written to the result sink.
    pub display: String,
}

/// Errors that can occur while submitting a form.
#[derive(thiserror::Error, Debug)]
pub enum PredictError {
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Endpoint returned HTTP {status}: {body}")]
    NonSuccessStatus { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedResponseBody(String),

    #[error("Response is missing expected field: {0}")]
    MissingExpectedField(String),

    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Field {name:?} is not numeric: {raw:?}")]
    InvalidField { name: String, raw: String },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result type.
pub type PredictResult<T> = Result<T, PredictError>;
