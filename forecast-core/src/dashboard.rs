//! Presentation state and view models for the dashboard.
//!
//! Nothing here talks to the network or decides anything about the forecast;
//! it only shapes what is already in [`AppState`](crate::AppState) for
//! display and keeps transient UI state.

use parking_lot::Mutex;
use std::{sync::Arc, time::Instant};

use crate::{
    chart::{ChartGeometry, HourlyChart},
    error::{ErrorKind, ForecastError},
    inspector::CopyButton,
    map::{MapView, Overlay, Transition},
    model::ForecastRecord,
    repeat::{ControlPad, SharedMap},
};

/// Transient UI state that lives as long as the dashboard is mounted.
#[derive(Debug)]
pub struct DashboardState {
    pub search_query: String,
    map: SharedMap,
    controls: ControlPad,
    copy: CopyButton,
    inspector_open: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        let map: SharedMap = Arc::new(Mutex::new(MapView::default()));
        Self {
            search_query: String::new(),
            controls: ControlPad::new(Arc::clone(&map)),
            map,
            copy: CopyButton::default(),
            inspector_open: false,
        }
    }
}

impl DashboardState {
    /// Takes the trimmed query if non-blank and clears the field.
    pub fn submit_search(&mut self) -> Option<String> {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.search_query.clear();
        Some(query)
    }

    pub fn map(&self) -> MapView {
        self.map.lock().clone()
    }

    pub fn controls(&mut self) -> &mut ControlPad {
        &mut self.controls
    }

    pub fn select_overlay(&mut self, overlay: Overlay) -> Option<Transition> {
        self.map.lock().switch_overlay(overlay)
    }

    pub fn open_inspector(&mut self) {
        self.inspector_open = true;
        self.copy.reset();
    }

    pub fn close_inspector(&mut self) {
        self.inspector_open = false;
    }

    pub fn inspector_open(&self) -> bool {
        self.inspector_open
    }

    pub fn mark_copied(&mut self, now: Instant) {
        self.copy.copied(now);
    }

    pub fn copy_label(&self, now: Instant) -> &'static str {
        self.copy.label(now)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub label: &'static str,
    pub value: String,
}

/// Display-ready view of one forecast.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub record: &'a ForecastRecord,
    /// The location up to the first comma, e.g. "London" for "London, UK".
    pub headline: &'a str,
    pub highlights: Vec<Highlight>,
    pub chart: HourlyChart,
}

impl<'a> DashboardView<'a> {
    pub fn build(record: &'a ForecastRecord, geometry: ChartGeometry) -> Self {
        let headline = record.location.split(',').next().unwrap_or_default().trim();
        let current = &record.current;

        let mut highlights = vec![
            Highlight {
                label: "Wind",
                value: format!("{} km/h", current.wind.speed),
            },
            Highlight {
                label: "Humidity",
                value: format!("{}%", current.humidity),
            },
            Highlight {
                label: "Direction",
                value: current.wind.direction.clone(),
            },
            Highlight {
                label: "Pressure",
                value: format!("{} hPa", current.pressure),
            },
            Highlight {
                label: "Feels like",
                value: format!("{}°C", current.feels_like),
            },
        ];
        if let Some(gust) = current.wind.gust {
            highlights.push(Highlight {
                label: "Gusts",
                value: format!("{gust} km/h"),
            });
        }
        highlights.extend([
            Highlight {
                label: "Visibility",
                value: format!("{} km", current.visibility),
            },
            Highlight {
                label: "UV index",
                value: format!("{} ({})", current.uv_index.value, current.uv_index.description),
            },
            Highlight {
                label: "Air quality",
                value: format!("{} ({})", current.aqi.value, current.aqi.description),
            },
            Highlight {
                label: "Sunrise",
                value: current.sunrise.clone(),
            },
            Highlight {
                label: "Sunset",
                value: current.sunset.clone(),
            },
        ]);

        Self {
            record,
            headline,
            highlights,
            chart: HourlyChart::new(&record.hourly, geometry),
        }
    }

    pub fn current_temp(&self) -> f64 {
        self.record.current.temp
    }
}

/// Content of the modal shown while an error is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: &'static str,
    pub heading: &'static str,
    pub suggestions: &'static [&'static str],
    /// The user-facing message for the error.
    pub message: String,
    /// The underlying failure text, unchanged.
    pub detail: String,
    pub retry_label: &'static str,
}

const AUTH_TIPS: &[&str] = &[
    "Ensure the Gemini API key is correctly set up in your environment.",
    "Verify that the key has not expired or been revoked.",
];

const NETWORK_TIPS: &[&str] = &[
    "Is your internet connection stable?",
    "Try disabling any VPNs or firewalls that might be interfering.",
];

const LOCATION_TIPS: &[&str] = &[
    "Make sure you've entered a valid city name.",
    "Try being more specific, e.g., 'Paris, France' instead of 'Paris'.",
];

const GENERAL_TIPS: &[&str] = &[
    "Please try your request again in a few moments.",
    "If the problem persists, run with -v for more details.",
];

impl ErrorDialog {
    pub fn for_error(err: &ForecastError) -> Self {
        let (title, heading, suggestions) = match err.kind() {
            ErrorKind::Auth => (
                "API Key Error",
                "Please check your API key configuration:",
                AUTH_TIPS,
            ),
            ErrorKind::Network => (
                "Connection Issue",
                "Here are a few things to check:",
                NETWORK_TIPS,
            ),
            ErrorKind::Location => ("Invalid Location", "What to do next:", LOCATION_TIPS),
            ErrorKind::Unknown => (
                "Oops! Something went wrong.",
                "An unexpected error occurred. Here are some general tips:",
                GENERAL_TIPS,
            ),
        };

        Self {
            title,
            heading,
            suggestions,
            message: err.to_string(),
            detail: err.raw().to_string(),
            retry_label: "Try Again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Operation, model::fixtures};
    use std::time::Duration;

    #[test]
    fn headline_is_text_before_first_comma() {
        let record = fixtures::record("London, England, UK");
        let view = DashboardView::build(&record, ChartGeometry::default());

        assert_eq!(view.headline, "London");
        assert_eq!(view.current_temp(), 14.0);
        assert_eq!(view.chart.labels().len(), 10);
    }

    #[test]
    fn gust_highlight_only_when_present() {
        let mut record = fixtures::record("Oslo");
        let view = DashboardView::build(&record, ChartGeometry::default());
        assert!(view.highlights.iter().any(|h| h.label == "Gusts"));

        record.current.wind.gust = None;
        let view = DashboardView::build(&record, ChartGeometry::default());
        assert!(view.highlights.iter().all(|h| h.label != "Gusts"));
        assert_eq!(view.headline, "Oslo");
    }

    #[test]
    fn submit_search_trims_and_clears() {
        let mut ui = DashboardState::default();
        ui.search_query = "   ".into();
        assert_eq!(ui.submit_search(), None);

        ui.search_query = "  Lisbon ".into();
        assert_eq!(ui.submit_search().as_deref(), Some("Lisbon"));
        assert!(ui.search_query.is_empty());
    }

    #[test]
    fn overlay_selection_goes_through_cross_fade() {
        let mut ui = DashboardState::default();
        assert!(ui.select_overlay(Overlay::Precipitation).is_none());
        assert!(ui.select_overlay(Overlay::Temperature).is_some());
        assert_eq!(ui.map().overlay().active(), Overlay::Temperature);
    }

    #[test]
    fn reopening_inspector_resets_copy_label() {
        let now = Instant::now();
        let mut ui = DashboardState::default();
        ui.open_inspector();
        ui.mark_copied(now);
        assert_eq!(ui.copy_label(now + Duration::from_millis(500)), "Copied!");

        ui.close_inspector();
        ui.open_inspector();
        assert_eq!(ui.copy_label(now + Duration::from_millis(500)), "Copy");
    }

    #[test]
    fn dialog_keeps_raw_message() {
        let err = ForecastError::Auth {
            raw: "403 permission denied".into(),
        };
        let dialog = ErrorDialog::for_error(&err);

        assert_eq!(dialog.title, "API Key Error");
        assert_eq!(dialog.detail, "403 permission denied");
        assert!(dialog.message.starts_with("Invalid Gemini API Key"));
        assert_eq!(dialog.suggestions.len(), 2);
    }

    #[test]
    fn unknown_dialog_shows_message_verbatim() {
        let err = ForecastError::Unknown {
            raw: "quota exhausted".into(),
        };
        let dialog = ErrorDialog::for_error(&err);
        assert_eq!(dialog.title, "Oops! Something went wrong.");
        assert_eq!(dialog.message, "quota exhausted");

        let err = ForecastError::Network {
            operation: Operation::Forecast,
            raw: "network down".into(),
        };
        assert_eq!(ErrorDialog::for_error(&err).title, "Connection Issue");
    }
}
