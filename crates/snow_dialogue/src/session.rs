//! Conversation session

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::{FailureClass, ServiceError};
use crate::rules::CannedRules;
use crate::service::TextService;
use crate::status::SessionStatus;
use crate::transcript::{ChatTranscript, Message};

/// Session timing and delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Speaking time per reply character, in milliseconds
    pub ms_per_char: u64,
    /// Upper bound on the speaking time, in milliseconds
    pub speaking_cap_ms: u64,
    /// Time the errored status is shown, in milliseconds
    pub error_idle_ms: u64,
    /// Use incremental delivery when the service supports it
    pub streaming: bool,
}

impl SessionConfig {
    /// How long the NPC "speaks" a reply
    pub fn speaking_duration(&self, reply: &str) -> Duration {
        let chars = reply.chars().count() as u64;
        Duration::from_millis(chars.saturating_mul(self.ms_per_char).min(self.speaking_cap_ms))
    }

    pub fn error_duration(&self) -> Duration {
        Duration::from_millis(self.error_idle_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ms_per_char: 60,
            speaking_cap_ms: 8000,
            error_idle_ms: 3000,
            streaming: true,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    transcript: ChatTranscript,
    status: SessionStatus,
    in_flight: bool,
    /// The trailing assistant entry belongs to the running stream
    streaming_entry: bool,
    /// Bumped on reset; work from an older generation is dropped
    generation: u64,
    /// Bumped on every status change; idle timers only fire on a match
    status_version: u64,
}

impl SessionState {
    fn set_status(&mut self, status: SessionStatus) -> u64 {
        self.status = status;
        self.status_version += 1;
        self.status_version
    }
}

/// One conversation with the NPC.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct ConversationSession {
    state: Arc<Mutex<SessionState>>,
    service: Arc<dyn TextService>,
    rules: Arc<CannedRules>,
    config: Arc<SessionConfig>,
}

impl ConversationSession {
    pub fn new(service: Arc<dyn TextService>, rules: CannedRules, config: SessionConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            service,
            rules: Arc::new(rules),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().status
    }

    /// True from the moment a message is accepted until its reply (or
    /// fallback) is in the transcript
    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Entries the UI renders
    pub fn visible_messages(&self) -> Vec<Message> {
        self.state.lock().transcript.visible().to_vec()
    }

    /// Full history
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().transcript.messages().to_vec()
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Send a player message.
    ///
    /// Returns `None` when the message is ignored: blank text, an exchange
    /// already in flight, or no tokio runtime to run it on. Otherwise the
    /// user entry is already in the transcript and the returned task
    /// completes once the terminal assistant entry is committed.
    pub fn send_message(&self, text: &str) -> Option<JoinHandle<()>> {
        if text.trim().is_empty() {
            return None;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Message dropped, no async runtime: {}", e);
                return None;
            }
        };

        let generation = {
            let mut state = self.state.lock();
            if state.in_flight {
                log::debug!("Message ignored while a reply is pending");
                return None;
            }
            state.in_flight = true;
            state.streaming_entry = false;
            state.transcript.push(Message::user(text));
            state.set_status(SessionStatus::AwaitingResponse);
            state.generation
        };

        let session = self.clone();
        let text = text.to_string();
        Some(runtime.spawn(async move { session.exchange(text, generation).await }))
    }

    /// Clear the transcript and return to idle. Output still arriving from
    /// an earlier exchange is discarded.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.transcript.clear();
        state.in_flight = false;
        state.streaming_entry = false;
        state.set_status(SessionStatus::Idle);
        log::debug!("Conversation reset (generation {})", state.generation);
    }

    async fn exchange(&self, text: String, generation: u64) {
        if let Some(reply) = self.rules.reply_for(&text) {
            log::debug!("Canned reply");
            self.complete(generation, reply.to_string());
            return;
        }

        if self.config.streaming && self.service.supports_streaming() {
            self.exchange_streaming(&text, generation).await;
        } else {
            match self.service.generate(&text).await {
                Ok(reply) if reply.trim().is_empty() => {
                    self.fail(generation, ServiceError::InvalidResponse("empty reply".to_string()))
                }
                Ok(reply) => self.complete(generation, reply),
                Err(e) => self.fail(generation, e),
            }
        }
    }

    async fn exchange_streaming(&self, text: &str, generation: u64) {
        let mut stream = match self.service.generate_stream(text).await {
            Ok(stream) => stream,
            Err(e) => {
                self.fail(generation, e);
                return;
            }
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.transcript.push(Message::assistant(""));
            state.streaming_entry = true;
            state.set_status(SessionStatus::Streaming);
        }

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    let mut state = self.state.lock();
                    if state.generation != generation {
                        log::debug!("Dropping late chunk from a reset conversation");
                        return;
                    }
                    state.transcript.extend_last_assistant(&chunk);
                }
                Err(e) => {
                    self.fail(generation, e);
                    return;
                }
            }
        }

        let reply = {
            let state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.transcript.last().map(|m| m.content.clone()).unwrap_or_default()
        };
        if reply.trim().is_empty() {
            self.fail(generation, ServiceError::InvalidResponse("empty reply".to_string()));
        } else {
            self.complete(generation, reply);
        }
    }

    /// Commit a successful reply and schedule the return to idle
    fn complete(&self, generation: u64, reply: String) {
        let delay = self.config.speaking_duration(&reply);
        let version = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            if state.streaming_entry {
                state.transcript.replace_last_assistant(reply);
            } else {
                state.transcript.push(Message::assistant(reply));
            }
            state.streaming_entry = false;
            state.in_flight = false;
            state.set_status(SessionStatus::Speaking)
        };
        self.schedule_idle(version, delay);
    }

    /// Commit the fallback for a failure and schedule the return to idle
    fn fail(&self, generation: u64, error: ServiceError) {
        let class = FailureClass::from(&error);
        log::warn!("Text service failed ({:?}): {}", class, error);

        let version = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            // A partial streamed reply is replaced so each user entry keeps
            // exactly one assistant entry
            if state.streaming_entry {
                state.transcript.replace_last_assistant(class.fallback_text());
            } else {
                state.transcript.push(Message::assistant(class.fallback_text()));
            }
            state.streaming_entry = false;
            state.in_flight = false;
            state.set_status(SessionStatus::Errored)
        };
        self.schedule_idle(version, self.config.error_duration());
    }

    fn schedule_idle(&self, version: u64, delay: Duration) {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock();
            if state.status_version == version {
                state.set_status(SessionStatus::Idle);
            }
        });
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ConversationSession")
            .field("status", &state.status)
            .field("in_flight", &state.in_flight)
            .field("messages", &state.transcript.len())
            .field("generation", &state.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaking_duration_is_capped() {
        let config = SessionConfig::default();
        assert_eq!(config.speaking_duration("Ho ho ho!"), Duration::from_millis(9 * 60));
        assert_eq!(config.speaking_duration(&"x".repeat(1000)), Duration::from_millis(8000));
        assert_eq!(config.speaking_duration("÷"), Duration::from_millis(60));
    }

    #[test]
    fn test_send_without_runtime_is_ignored() {
        let session = ConversationSession::new(
            Arc::new(crate::service::OfflineService::default()),
            CannedRules::default(),
            SessionConfig::default(),
        );
        assert!(session.send_message("hello").is_none());
        assert!(session.messages().is_empty());
        assert!(!session.is_loading());
    }
}
