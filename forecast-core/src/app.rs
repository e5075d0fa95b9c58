//! Application state and the session that drives it.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    client::ForecastClient,
    error::ForecastError,
    model::{ForecastRecord, ForecastRequest, WeatherAlert},
    theme::ThemeController,
};

/// What the main area shows. The dashboard only exists in `Ready`.
#[derive(Debug, Clone)]
pub enum Phase {
    Loading,
    Ready(Arc<ForecastRecord>),
    Failed(ForecastError),
}

/// Issued when a request starts; only the newest ticket may complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    request: ForecastRequest,
}

impl RequestTicket {
    pub fn request(&self) -> &ForecastRequest {
        &self.request
    }
}

/// Everything the presentation layer reads, in one place.
#[derive(Debug)]
pub struct AppState {
    request: ForecastRequest,
    phase: Phase,
    theme: ThemeController,
    generation: u64,
    last_location: Option<String>,
    announcement: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(request: ForecastRequest, theme: ThemeController) -> Self {
        Self {
            request,
            phase: Phase::Loading,
            theme,
            generation: 0,
            last_location: None,
            announcement: None,
            fetched_at: None,
        }
    }

    pub fn request(&self) -> &ForecastRequest {
        &self.request
    }

    pub fn location(&self) -> &str {
        &self.request.location
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// The record to render, if the dashboard is mounted.
    pub fn dashboard(&self) -> Option<&Arc<ForecastRecord>> {
        match &self.phase {
            Phase::Ready(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ForecastError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeController {
        &mut self.theme
    }

    /// Set when a newly loaded forecast is for a different place than the last one.
    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.request.location = location.into();
    }

    pub fn begin_request(&mut self) -> RequestTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        RequestTicket {
            generation: self.generation,
            request: self.request.clone(),
        }
    }

    /// Apply a finished request. Returns `false` if a newer request has
    /// started since, in which case the result is dropped.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<ForecastRecord, ForecastError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded forecast response"
            );
            return false;
        }

        match result {
            Ok(record) => {
                let moved = self
                    .last_location
                    .as_deref()
                    .is_some_and(|prev| prev != record.location);
                if moved {
                    self.announcement =
                        Some(format!("Weather data has been updated for {}.", record.location));
                }
                self.last_location = Some(record.location.clone());
                self.fetched_at = Some(Utc::now());
                self.phase = Phase::Ready(Arc::new(record));
            }
            Err(err) => {
                self.phase = Phase::Failed(err);
            }
        }
        true
    }
}

/// Couples the app state with the client that feeds it.
#[derive(Debug)]
pub struct Session {
    client: ForecastClient,
    state: AppState,
}

impl Session {
    pub fn new(client: ForecastClient, state: AppState) -> Self {
        Self { client, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Fetch the forecast for the current target. Used on mount.
    pub async fn load(&mut self) -> &Phase {
        let ticket = self.state.begin_request();
        info!(location = %ticket.request.location, days = ticket.request.days, "loading forecast");

        let result = self.client.fetch_forecast(ticket.request()).await;
        self.state.complete(ticket, result);
        self.state.phase()
    }

    /// Switch to a new location. Blank input is ignored and returns `false`.
    pub async fn search(&mut self, query: &str) -> bool {
        let location = query.trim();
        if location.is_empty() {
            return false;
        }

        self.state.set_location(location);
        self.load().await;
        true
    }

    /// Re-issue the identical request after an error.
    pub async fn retry(&mut self) -> &Phase {
        self.load().await
    }

    pub async fn alerts(&self) -> Result<Vec<WeatherAlert>, ForecastError> {
        self.client.fetch_alerts(self.state.location()).await
    }

    pub async fn ask(&self, question: &str) -> Result<String, ForecastError> {
        let record = self.state.dashboard().ok_or_else(|| ForecastError::Unknown {
            raw: "No forecast is loaded yet; load one before asking a question.".to_string(),
        })?;

        self.client.ask_follow_up(question, record).await
    }
}
