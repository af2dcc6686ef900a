//! The form submission adapter.
//!
//! `submit` runs the whole round trip: collect the form, coerce its values,
//! POST them, and write the rendered prediction to the result sink. The
//! network call is the only await point.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::client::PredictionClient;
use crate::coerce::{coerce_entries, CoercionPolicy};
use crate::form::FormSource;
use crate::render::{render_price, ResultSink};
use crate::types::{FormPayload, PredictError, PredictResult, Submission, SubmissionState};

/// How overlapping submissions are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    /// Every submit runs on its own; the last response to land wins the sink.
    #[default]
    Independent,
    /// A submit issued while another is outstanding fails with
    /// [`PredictError::SubmissionInFlight`].
    RejectWhileInFlight,
}

/// Tunables for [`SubmissionAdapter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AdapterOptions {
    pub coercion: CoercionPolicy,
    pub concurrency: ConcurrencyPolicy,
}

/// Binds a prediction client to a result sink.
pub struct SubmissionAdapter<C, S> {
    client: C,
    sink: S,
    options: AdapterOptions,
    in_flight: AtomicUsize,
}

impl<C: PredictionClient, S: ResultSink> SubmissionAdapter<C, S> {
    pub fn new(client: C, sink: S) -> Self {
        Self {
            client,
            sink,
            options: AdapterOptions::default(),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_options(mut self, options: AdapterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> AdapterOptions {
        self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// `Submitting` while at least one submission is outstanding.
    pub fn state(&self) -> SubmissionState {
        if self.in_flight() > 0 {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    /// Number of outstanding submissions.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Collect and coerce the form without sending anything.
    pub fn prepare(&self, form: &dyn FormSource) -> PredictResult<FormPayload> {
        coerce_entries(&form.entries(), self.options.coercion)
    }

    /// Submit the form and render the prediction.
    ///
    /// Request, status, and decode failures are returned and the sink is
    /// left untouched. A response without `predicted_price` still renders,
    /// as `NaN`.
    pub async fn submit(&self, form: &dyn FormSource) -> PredictResult<Submission> {
        let _guard = self.enter()?;

        let payload = self.prepare(form)?;
        let response = match self.client.predict(&payload).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Prediction request failed: {e}");
                return Err(e);
            }
        };

        let price = match response.predicted_price() {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!("{e}; rendering NaN");
                f64::NAN
            }
        };

        let display = render_price(price);
        self.sink.write_text(&display);
        let rendered = &display;
        tracing::info!(display = %rendered, "prediction rendered");

        Ok(Submission {
            payload,
            response,
            display,
        })
    }

    fn enter(&self) -> PredictResult<InFlightGuard<'_>> {
        match self.options.concurrency {
            ConcurrencyPolicy::Independent => {
                self.in_flight.fetch_add(1, Ordering::AcqRel);
            }
            ConcurrencyPolicy::RejectWhileInFlight => {
                self.in_flight
                    .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                    .map_err(|_| PredictError::SubmissionInFlight)?;
            }
        }
        Ok(InFlightGuard(&self.in_flight))
    }
}

/// Decrements the in-flight count when a submission ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
