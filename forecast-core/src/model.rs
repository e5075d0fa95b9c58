use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Number of daily entries requested when the caller does not say otherwise.
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

/// Longest daily forecast a config file or `--days` may ask for.
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Number of hourly points the model is asked for and the chart displays.
pub const HOURLY_POINTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// Free text, embedded verbatim into the prompt.
    pub location: String,
    pub days: u8,
}

impl ForecastRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            days: DEFAULT_FORECAST_DAYS,
        }
    }

    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }
}

/// A complete forecast as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub location: String,
    pub date: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temp: f64,
    pub feels_like: f64,
    pub condition: String,
    pub wind: Wind,
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// km
    pub visibility: f64,
    pub uv_index: Reading,
    pub sunrise: String,
    pub sunset: String,
    pub aqi: Reading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// km/h
    pub speed: f64,
    pub direction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

/// A numeric index paired with its textual band, e.g. UV 3 "Moderate".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: String,
    pub temp: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: String,
    pub condition: String,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub source: String,
}

/// Decoded case-insensitively; the model does not always keep the casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Extreme => "Extreme",
        }
    }

    pub const fn all() -> &'static [Severity] {
        &[Severity::Low, Severity::Moderate, Severity::High, Severity::Extreme]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Severity::all()
            .iter()
            .copied()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown alert severity '{s}'."))
    }
}

impl TryFrom<String> for Severity {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
