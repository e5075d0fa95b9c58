//! In-process model double for tests and offline demos.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

use crate::provider::{GenerateRequest, GenerativeModel, ProviderError};

/// Replies with queued responses in order and records every request.
///
/// Clones share the same queue and log, so a test can keep one clone to
/// inspect what the client sent.
#[derive(Debug, Clone, Default)]
pub struct ScriptedModel {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.inner.replies.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue a provider failure carrying `message` verbatim.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.inner.replies.lock().push_back(Err(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.inner.requests.lock().clone()
    }

    pub fn boxed(&self) -> Box<dyn GenerativeModel> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        self.inner.requests.lock().push(request.clone());

        match self.inner.replies.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Other(message)),
            None => Err(ProviderError::Other("scripted model has no reply queued".into())),
        }
    }
}
