//! Response schemas handed to the model for constrained JSON output.
//!
//! The schemas are data, not code: they describe the wire shape of
//! [`ForecastRecord`](crate::ForecastRecord) and
//! [`WeatherAlert`](crate::WeatherAlert) in the provider's type vocabulary.

use serde_json::{Value, json};

use crate::Severity;

/// Bumped whenever a field is added, removed or changes meaning.
pub const SCHEMA_VERSION: u32 = 2;

pub fn forecast_schema(days: u8) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "location": { "type": "STRING", "description": "The city and country, e.g., 'New York, US'" },
            "date": { "type": "STRING", "description": "Current date and time in a readable format, e.g., '9 October 2025 | 06:47 PM'" },
            "current": {
                "type": "OBJECT",
                "properties": {
                    "temp": { "type": "NUMBER", "description": "Current temperature in Celsius." },
                    "feelsLike": { "type": "NUMBER", "description": "The 'feels like' temperature in Celsius, accounting for wind chill and humidity." },
                    "condition": { "type": "STRING", "description": "A brief weather condition, e.g., 'Heavy Rain', 'Sunny', 'Partly Cloudy'." },
                    "wind": {
                        "type": "OBJECT",
                        "properties": {
                            "speed": { "type": "NUMBER", "description": "Wind speed in km/h." },
                            "direction": { "type": "STRING", "description": "Wind direction, e.g., 'Northwest'." },
                            "gust": { "type": "NUMBER", "description": "Wind gust speed in km/h. This is optional." }
                        },
                        "required": ["speed", "direction"]
                    },
                    "humidity": { "type": "NUMBER", "description": "Humidity percentage, e.g., 78." },
                    "pressure": { "type": "NUMBER", "description": "Atmospheric pressure in hPa, e.g., 1013." },
                    "visibility": { "type": "NUMBER", "description": "Visibility in km, e.g., 10." },
                    "uvIndex": reading("UV index value, e.g., 3.", "UV index description, e.g., 'Moderate'."),
                    "sunrise": { "type": "STRING", "description": "Sunrise time in HH:MM AM/PM format, e.g., '06:15 AM'." },
                    "sunset": { "type": "STRING", "description": "Sunset time in HH:MM AM/PM format, e.g., '07:30 PM'." },
                    "aqi": reading("Air Quality Index value.", "AQI description, e.g., 'Good', 'Moderate', 'Unhealthy'.")
                },
                "required": [
                    "temp", "feelsLike", "condition", "wind", "humidity", "pressure",
                    "visibility", "uvIndex", "sunrise", "sunset", "aqi"
                ]
            },
            "hourly": {
                "type": "ARRAY",
                "description": "A 10-hour forecast starting from the next rounded hour.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "time": { "type": "STRING", "description": "Time for the forecast, e.g., '09:00'." },
                        "temp": { "type": "NUMBER", "description": "Temperature in Celsius." },
                        "condition": { "type": "STRING", "description": "Brief weather condition for that hour." }
                    },
                    "required": ["time", "temp", "condition"]
                }
            },
            "daily": {
                "type": "ARRAY",
                "description": format!("A {days}-day forecast starting from tomorrow."),
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING", "description": "Day and date, e.g., 'Friday, April 21'." },
                        "condition": { "type": "STRING", "description": "Brief weather condition for that day." },
                        "low": { "type": "NUMBER", "description": "Lowest temperature in Celsius." },
                        "high": { "type": "NUMBER", "description": "Highest temperature in Celsius." }
                    },
                    "required": ["day", "condition", "low", "high"]
                }
            }
        },
        "required": ["location", "date", "current", "hourly", "daily"]
    })
}

pub fn alerts_schema() -> Value {
    let levels: Vec<&str> = Severity::all().iter().map(Severity::as_str).collect();
    json!({
        "type": "ARRAY",
        "description": "A list of current weather alerts for the specified location. If there are no alerts, return an empty array.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "The title of the alert, e.g., 'Severe Thunderstorm Warning'." },
                "description": { "type": "STRING", "description": "A detailed description of the alert." },
                "severity": {
                    "type": "STRING",
                    "format": "enum",
                    "enum": levels,
                    "description": "The severity level of the alert. Can be 'Low', 'Moderate', 'High', or 'Extreme'."
                },
                "source": { "type": "STRING", "description": "The source of the alert, e.g., 'National Weather Service'." }
            },
            "required": ["title", "description", "severity", "source"]
        }
    })
}

fn reading(value: &str, description: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "value": { "type": "NUMBER", "description": value },
            "description": { "type": "STRING", "description": description }
        },
        "required": ["value", "description"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn every_current_field_but_gust_is_required() {
        let schema = forecast_schema(7);
        let current = &schema["properties"]["current"];

        let props = current["properties"].as_object().unwrap();
        assert_eq!(props.len(), required(current).len());

        let wind = &current["properties"]["wind"];
        assert!(wind["properties"].get("gust").is_some());
        assert!(!required(wind).contains(&"gust"));
    }

    #[test]
    fn daily_description_carries_requested_days() {
        let schema = forecast_schema(3);
        assert_eq!(
            schema["properties"]["daily"]["description"],
            "A 3-day forecast starting from tomorrow."
        );
    }

    #[test]
    fn alerts_schema_is_an_array_of_objects() {
        let schema = alerts_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(required(&schema["items"]), ["title", "description", "severity", "source"]);
    }

    #[test]
    fn alert_severity_is_constrained_to_known_levels() {
        let severity = &alerts_schema()["items"]["properties"]["severity"];
        assert_eq!(severity["type"], "STRING");
        assert_eq!(severity["format"], "enum");
        assert_eq!(
            severity["enum"],
            serde_json::json!(["Low", "Moderate", "High", "Extreme"])
        );
    }
}
