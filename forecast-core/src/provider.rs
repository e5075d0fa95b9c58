use crate::{Config, provider::gemini::GeminiModel};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

pub mod gemini;

/// One prompt, optionally constrained to JSON matching `response_schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// Failures raised while talking to the model, before classification.
///
/// The display text is what the classifier sniffs, so each variant keeps
/// the provider's own wording intact.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No API key configured. Set GEMINI_API_KEY or run `forecast configure`.")]
    MissingApiKey,

    #[error("Network error: failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("got status: {status}. {body}")]
    Status { status: String, body: String },

    #[error("Malformed provider envelope: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait GenerativeModel: Send + Sync + Debug {
    /// Send one request and return the model's raw reply text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}

/// Build the configured model.
///
/// A missing API key does not fail here; every request will fail with
/// [`ProviderError::MissingApiKey`] instead.
pub fn model_from_config(config: &Config) -> anyhow::Result<Box<dyn GenerativeModel>> {
    Ok(Box::new(GeminiModel::from_config(config)?))
}
