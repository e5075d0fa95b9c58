//! Error taxonomy surfaced to the user.
//!
//! The provider exposes no structured error codes to this client, so failures
//! are sorted by sniffing the lowercased failure message. The rules live in a
//! single ordered table; the first matching rule wins and the last category
//! catches everything else.

use std::fmt;
use thiserror::Error;

use crate::provider::ProviderError;

/// Which client operation failed; only affects the user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Forecast,
    Alerts,
    FollowUp,
}

impl Operation {
    fn network_action(&self) -> &'static str {
        match self {
            Operation::Forecast => "fetch weather data",
            Operation::Alerts => "fetch alerts",
            Operation::FollowUp => "contact Gemini",
        }
    }

    fn location_subject(&self) -> &'static str {
        match self {
            Operation::Forecast => "data",
            Operation::Alerts => "alerts",
            Operation::FollowUp => "an answer",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Forecast => "forecast",
            Operation::Alerts => "alerts",
            Operation::FollowUp => "follow-up",
        })
    }
}

/// A raw failure, prior to classification.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl Failure {
    pub fn message(&self) -> String {
        self.to_string()
    }

    fn is_parse(&self) -> bool {
        matches!(self, Failure::Parse(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    Network,
    Location,
    Unknown,
}

/// A classified failure. `Display` is the user-facing message; [`raw`]
/// keeps the original failure text.
///
/// [`raw`]: ForecastError::raw
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Invalid Gemini API Key. Please ensure your API key is configured correctly.")]
    Auth { raw: String },

    #[error(
        "Network Error: Could not {}. Please check your internet connection.",
        .operation.network_action()
    )]
    Network { operation: Operation, raw: String },

    #[error(
        "Invalid Location: Could not retrieve {} for the specified location. Please try a different one.",
        .operation.location_subject()
    )]
    Location { operation: Operation, raw: String },

    #[error("{raw}")]
    Unknown { raw: String },
}

impl ForecastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::Auth { .. } => ErrorKind::Auth,
            ForecastError::Network { .. } => ErrorKind::Network,
            ForecastError::Location { .. } => ErrorKind::Location,
            ForecastError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            ForecastError::Auth { raw }
            | ForecastError::Network { raw, .. }
            | ForecastError::Location { raw, .. }
            | ForecastError::Unknown { raw } => raw,
        }
    }

    fn new(kind: ErrorKind, operation: Operation, raw: String) -> Self {
        match kind {
            ErrorKind::Auth => ForecastError::Auth { raw },
            ErrorKind::Network => ForecastError::Network { operation, raw },
            ErrorKind::Location => ForecastError::Location { operation, raw },
            ErrorKind::Unknown => ForecastError::Unknown { raw },
        }
    }
}

type Predicate = fn(is_parse: bool, lowered: &str) -> bool;

/// Evaluated top to bottom; anything unmatched is [`ErrorKind::Unknown`].
const RULES: &[(Predicate, ErrorKind)] = &[
    (mentions_credentials, ErrorKind::Auth),
    (mentions_transport, ErrorKind::Network),
    (is_bad_request, ErrorKind::Location),
];

fn mentions_credentials(_: bool, lowered: &str) -> bool {
    lowered.contains("api key") || lowered.contains("permission denied")
}

fn mentions_transport(_: bool, lowered: &str) -> bool {
    lowered.contains("fetch") || lowered.contains("network")
}

// Malformed model output lands here too; the two cases share a category.
fn is_bad_request(is_parse: bool, lowered: &str) -> bool {
    is_parse || lowered.contains("400")
}

/// Pure, total mapping from a message (and whether it came from a JSON
/// parse) to its category.
pub fn classify_message(message: &str, is_parse: bool) -> ErrorKind {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|(matches, _)| matches(is_parse, &lowered))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Unknown)
}

pub fn classify(operation: Operation, failure: &Failure) -> ForecastError {
    let raw = failure.message();
    let kind = classify_message(&raw, failure.is_parse());
    ForecastError::new(kind, operation, raw)
}
