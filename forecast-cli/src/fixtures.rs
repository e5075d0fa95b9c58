//! Forecast data shared by the CLI's unit tests.

use forecast_core::ForecastRecord;
use serde_json::{Value, json};

/// A Lisbon forecast as the model would return it.
pub fn lisbon() -> Value {
    json!({
        "location": "Lisbon, Portugal",
        "date": "12 June 2025 | 10:00 AM",
        "current": {
            "temp": 24, "feelsLike": 25, "condition": "Sunny",
            "wind": { "speed": 12, "direction": "North", "gust": 20 },
            "humidity": 55, "pressure": 1016, "visibility": 10,
            "uvIndex": { "value": 7, "description": "High" },
            "sunrise": "06:12 AM", "sunset": "09:04 PM",
            "aqi": { "value": 31, "description": "Good" }
        },
        "hourly": [
            { "time": "11:00", "temp": 24, "condition": "Sunny" },
            { "time": "12:00", "temp": 26, "condition": "Sunny" }
        ],
        "daily": [
            { "day": "Friday, June 13", "condition": "Sunny", "low": 18, "high": 28 }
        ]
    })
}

pub fn record() -> ForecastRecord {
    serde_json::from_value(lisbon()).unwrap()
}
