//! Core library for the `forecast` weather dashboard.
//!
//! This crate defines:
//! - The forecast client that asks a generative model for structured weather
//!   data and classifies its failures
//! - Shared domain models, response schemas and prompts
//! - Configuration & credentials handling
//! - Dashboard state: map overlay and pan/zoom controls, hourly chart
//!   geometry, the raw JSON inspector and theme persistence
//!
//! It is used by `forecast-cli`, but holds no terminal-specific code and can
//! back other front ends.

pub mod app;
pub mod chart;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod inspector;
pub mod map;
pub mod model;
pub mod prompt;
pub mod provider;
pub mod repeat;
pub mod schema;
pub mod testing;
pub mod theme;

pub use app::{AppState, Phase, RequestTicket, Session};
pub use client::ForecastClient;
pub use config::{Config, GeminiConfig};
pub use dashboard::{DashboardState, DashboardView, ErrorDialog};
pub use error::{ErrorKind, ForecastError, Operation};
pub use model::{
    CurrentConditions, DailyForecast, ForecastRecord, ForecastRequest, HourlyForecast,
    MAX_FORECAST_DAYS, Reading, Severity, WeatherAlert, Wind,
};
pub use provider::{GenerateRequest, GenerativeModel, ProviderError};
pub use theme::{Theme, ThemeController, ThemeStore};
