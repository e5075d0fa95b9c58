//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};

/// A well-formed forecast for `location` with ten hourly points and
/// `days` daily entries, as the model would return it.
pub fn forecast_json(location: &str, days: usize) -> Value {
    let hourly: Vec<Value> = (0..10u32)
        .map(|i| {
            json!({
                "time": format!("{:02}:00", (19 + i) % 24),
                "temp": 12.0 - f64::from(i) * 0.5,
                "condition": "Cloudy"
            })
        })
        .collect();
    let daily: Vec<Value> = [
        "Friday, October 10",
        "Saturday, October 11",
        "Sunday, October 12",
        "Monday, October 13",
        "Tuesday, October 14",
        "Wednesday, October 15",
        "Thursday, October 16",
    ]
    .iter()
    .cycle()
    .take(days)
    .map(|day| json!({ "day": day, "condition": "Showers", "low": 8, "high": 14 }))
    .collect();

    json!({
        "location": location,
        "date": "9 October 2025 | 06:47 PM",
        "current": {
            "temp": 13,
            "feelsLike": 11.5,
            "condition": "Light Rain",
            "wind": { "speed": 19, "direction": "Southwest" },
            "humidity": 84,
            "pressure": 1008,
            "visibility": 8,
            "uvIndex": { "value": 0, "description": "Low" },
            "sunrise": "07:12 AM",
            "sunset": "06:21 PM",
            "aqi": { "value": 28, "description": "Good" }
        },
        "hourly": hourly,
        "daily": daily
    })
}

pub fn london_forecast() -> Value {
    forecast_json("London, UK", 7)
}

/// Wrap model output text in a generateContent envelope.
pub fn envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
