//! Text service contract

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};

use crate::error::{Result, ServiceError};

/// Incrementally delivered reply chunks
pub type TextStream = BoxStream<'static, Result<String>>;

/// A generative text backend.
///
/// Failures should carry the backend's numeric status code in their text so
/// [`FailureClass::classify`](crate::error::FailureClass::classify) can
/// recognise rate limiting (429) and unknown models (404).
#[async_trait]
pub trait TextService: Send + Sync {
    /// Produce a complete reply
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Whether [`generate_stream`](Self::generate_stream) delivers
    /// incrementally
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Produce a reply as a stream of chunks. Defaults to a single chunk
    /// holding the full reply.
    async fn generate_stream(&self, prompt: &str) -> Result<TextStream> {
        let reply = self.generate(prompt).await?;
        Ok(stream::once(async move { Ok(reply) }).boxed())
    }
}

/// Backend used when no real service is configured. Every request fails.
#[derive(Debug, Clone, Default)]
pub struct OfflineService {
    reason: String,
}

impl OfflineService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl TextService for OfflineService {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        log::debug!("Offline text service refused a request");
        Err(ServiceError::Offline(self.reason.clone()))
    }
}
