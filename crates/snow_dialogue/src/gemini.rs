//! Gemini client over the generative-language REST API

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};
use crate::service::{TextService, TextStream};

/// Default API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-lite-latest";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Default NPC persona
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are Santa Claus. Be jolly, warm, and helpful. Use 'Ho ho ho!' often.";

/// Client for Gemini's `generateContent` endpoints
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    system_instruction: String,
    streaming: bool,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_timeout(api_key, model, 60)
    }

    /// Create client with a custom request timeout
    pub fn with_timeout(api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = match Client::builder().timeout(Duration::from_secs(timeout_secs)).build() {
            Ok(client) => client,
            Err(e) => {
                log::warn!(
                    "HTTP client with {}s timeout unavailable ({}), requests will not time out",
                    timeout_secs,
                    ServiceError::from(e)
                );
                Client::new()
            }
        };

        Self {
            client,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            streaming: true,
        }
    }

    /// Create client from `GEMINI_API_KEY` and `GEMINI_MODEL`. Returns
    /// `None` without an API key.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        Some(Self::new(&api_key, &model))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    fn request_body(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: (!self.system_instruction.is_empty()).then(|| Content {
                role: None,
                parts: vec![Part {
                    text: Some(self.system_instruction.clone()),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }

    async fn post(&self, url: String, prompt: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            log::warn!("Gemini returned {}", status);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextService for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self.post(self.endpoint("generateContent"), prompt).await?;
        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        body.into_text()
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextStream> {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(url, prompt).await?;
        Ok(sse_text_stream(response.bytes_stream()))
    }
}

/// Turn an SSE byte stream into text chunks. Empty chunks are skipped, a
/// transport error ends the stream, and a final event without a trailing
/// newline is still delivered.
fn sse_text_stream<S, B>(bytes: S) -> TextStream
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let parse = |payloads: Vec<String>| -> Vec<Result<String>> {
        payloads.iter().map(|payload| parse_stream_payload(payload)).collect()
    };

    stream::unfold(
        (bytes.boxed(), SseDecoder::default(), false),
        move |(mut bytes, mut decoder, done)| async move {
            if done {
                return None;
            }
            let (chunks, done) = match bytes.next().await {
                Some(Ok(chunk)) => (parse(decoder.push(chunk.as_ref())), false),
                Some(Err(e)) => (vec![Err(ServiceError::from(e))], true),
                None => (parse(decoder.finish().into_iter().collect()), true),
            };
            Some((chunks, (bytes, decoder, done)))
        },
    )
    .flat_map(stream::iter)
    .filter(|chunk| future::ready(!matches!(chunk, Ok(text) if text.is_empty())))
    .boxed()
}

/// Splits a server-sent-event byte stream into `data:` payloads. Gemini
/// sends one `data:` line per event.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            payloads.extend(data_payload(&line));
        }
        payloads
    }

    /// Payload of an unterminated last line, once the byte stream has ended
    fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.buffer);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    line.strip_prefix("data:").map(|data| data.trim_start().to_string())
}

fn parse_stream_payload(payload: &str) -> Result<String> {
    let body: GenerateContentResponse =
        serde_json::from_str(payload).map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
    body.into_text()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate. A candidate without text
    /// (e.g. a trailing usage-only chunk) yields an empty string.
    fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(ServiceError::Status {
                status: error.code,
                body: error.message,
            });
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("No candidates in response".to_string()))?;

        Ok(candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default())
    }
}
