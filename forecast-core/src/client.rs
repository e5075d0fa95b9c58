use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    error::{Failure, ForecastError, Operation, classify},
    model::{ForecastRecord, ForecastRequest, HOURLY_POINTS, WeatherAlert},
    prompt,
    provider::{GenerateRequest, GenerativeModel},
    schema,
};

/// The only component that talks to the model.
///
/// Every call sends exactly one request and yields either a value or one
/// classified [`ForecastError`]; there is no retry and no partial result.
#[derive(Debug)]
pub struct ForecastClient {
    model: Box<dyn GenerativeModel>,
}

impl ForecastClient {
    pub fn new(model: Box<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self), fields(location = %request.location, days = request.days))]
    pub async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastRecord, ForecastError> {
        let generate = GenerateRequest::structured(
            prompt::forecast_prompt(&request.location, request.days),
            schema::forecast_schema(request.days),
        );

        let record: ForecastRecord = self.structured(Operation::Forecast, &generate).await?;

        if record.hourly.len() > HOURLY_POINTS {
            warn!(points = record.hourly.len(), "model returned more hourly points than requested");
        }
        if record.daily.len() != usize::from(request.days) {
            warn!(
                entries = record.daily.len(),
                expected = request.days,
                "model returned an unexpected number of daily entries"
            );
        }

        Ok(record)
    }

    /// An empty list means there are no active alerts.
    #[instrument(skip(self))]
    pub async fn fetch_alerts(&self, location: &str) -> Result<Vec<WeatherAlert>, ForecastError> {
        let generate =
            GenerateRequest::structured(prompt::alerts_prompt(location), schema::alerts_schema());

        let alerts: Vec<WeatherAlert> = self.structured(Operation::Alerts, &generate).await?;
        debug!(count = alerts.len(), "received weather alerts");
        Ok(alerts)
    }

    #[instrument(skip(self, record), fields(location = %record.location))]
    pub async fn ask_follow_up(
        &self,
        question: &str,
        record: &ForecastRecord,
    ) -> Result<String, ForecastError> {
        let prompt = prompt::follow_up_prompt(question, record)
            .map_err(|e| fail(Operation::FollowUp, e.into()))?;

        self.model
            .generate(&GenerateRequest::text(prompt))
            .await
            .map_err(|e| fail(Operation::FollowUp, e.into()))
    }

    async fn structured<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: &GenerateRequest,
    ) -> Result<T, ForecastError> {
        let text = self
            .model
            .generate(request)
            .await
            .map_err(|e| fail(operation, e.into()))?;

        // The provider enforces the schema; the shape is trusted as-is.
        serde_json::from_str(&text).map_err(|e| fail(operation, e.into()))
    }
}

fn fail(operation: Operation, failure: Failure) -> ForecastError {
    let err = classify(operation, &failure);
    warn!(%operation, kind = ?err.kind(), raw = %failure, "request failed");
    err
}
