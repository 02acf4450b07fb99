use crate::config::Config;
use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECONDS: u64 = 60;

const MISSING_KEY_WARN: &str =
    "Platform client disabled. Set API_KEY in your environment (or .env) to enable it";

/// Prompt sent alongside every image-captioning request. The platform's
/// vision service answers with a single descriptive sentence.
const CAPTION_PROMPT: &str = "The provided image is of a piece of clothing. \
Provide a precisely one-sentence-long caption which describes the item. \
The description should include color, material, and style. \
Be succinct, terse, and direct in the caption.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct CaptionRequest<'a> {
    prompt: &'a str,
    image: String,
}

/// One event of the caption stream. The service emits intermediate progress
/// events followed by the finished caption; the final event wins.
#[derive(Debug, Deserialize)]
struct CaptionEvent {
    content: String,
}

/// Client for the hosted AI platform: chat completions, text embeddings and
/// image captioning, all plain request/response HTTP.
///
/// Constructed explicitly and passed to whoever needs it. Without an API key
/// the client is disabled: every call logs a warning and returns an empty
/// sentinel instead of touching the network.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl PlatformClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.platform_base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn bearer(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Ask the chat model for a response to `query` under `system_prompt`.
    /// Returns an empty string when the client is disabled.
    pub async fn chat_completion(&self, system_prompt: &str, query: &str) -> Result<String> {
        if !self.is_enabled() {
            warn!("{}", MISSING_KEY_WARN);
            return Ok(String::new());
        }

        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
        };

        debug!("Requesting chat completion from {}", self.chat_model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.bearer())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Chat completion failed: {error_text}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Malformed chat response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalService("Chat response had no choices".to_string()))
    }

    /// Embed `text` into a semantic vector. Returns an empty vector when the
    /// client is disabled.
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        if !self.is_enabled() {
            warn!("{}", MISSING_KEY_WARN);
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        debug!("Requesting embedding from {}", self.embedding_model);
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.bearer())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Embedding request failed: {error_text}"
            )));
        }

        let embedding: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Malformed embedding response: {e}")))?;

        embedding
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| AppError::ExternalService("Embedding response had no data".to_string()))
    }

    /// Caption a clothing image via the platform's vision service.
    ///
    /// The service answers with a stream of newline-delimited JSON events;
    /// the final event carries the finished caption. Returns `None` when the
    /// client is disabled or the stream ends without any event.
    pub async fn caption_image(&self, image: &[u8]) -> Result<Option<String>> {
        if !self.is_enabled() {
            warn!("{}", MISSING_KEY_WARN);
            return Ok(None);
        }

        let request = CaptionRequest {
            prompt: CAPTION_PROMPT,
            image: STANDARD.encode(image),
        };

        debug!("Requesting image caption ({} byte payload)", image.len());
        let response = self
            .client
            .post(format!("{}/images/caption", self.base_url))
            .bearer_auth(self.bearer())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Caption request failed: {error_text}"
            )));
        }

        let mut caption = None;
        let mut buffer = String::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                if let Some(content) = parse_caption_event(line.trim())? {
                    caption = Some(content);
                }
            }
        }
        if let Some(content) = parse_caption_event(buffer.trim())? {
            caption = Some(content);
        }

        Ok(caption)
    }
}

/// Parse one line of the caption event stream. Blank lines and the terminal
/// `[DONE]` marker carry no content; anything else must be a JSON event,
/// optionally behind an SSE `data:` prefix.
fn parse_caption_event(line: &str) -> Result<Option<String>> {
    let payload = line.strip_prefix("data:").map(str::trim).unwrap_or(line);
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    let event: CaptionEvent = serde_json::from_str(payload)
        .map_err(|e| AppError::Serialization(format!("Malformed caption event: {e}")))?;
    Ok(Some(event.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn disabled_client() -> PlatformClient {
        PlatformClient::new(&Config::for_tests())
    }

    #[tokio::test]
    async fn disabled_chat_returns_empty_string() {
        let client = disabled_client();
        assert!(!client.is_enabled());
        let reply = client.chat_completion("system", "query").await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn disabled_embedding_returns_empty_vector() {
        let client = disabled_client();
        let embedding = client.embed_text("some text").await.unwrap();
        assert!(embedding.is_empty());
    }

    #[tokio::test]
    async fn disabled_captioning_returns_none() {
        let client = disabled_client();
        let caption = client.caption_image(&[0xff, 0xd8]).await.unwrap();
        assert!(caption.is_none());
    }

    #[test]
    fn caption_event_parses_plain_json() {
        let content = parse_caption_event(r#"{"content": "A navy wool coat."}"#).unwrap();
        assert_eq!(content.as_deref(), Some("A navy wool coat."));
    }

    #[test]
    fn caption_event_parses_sse_framing() {
        let content = parse_caption_event(r#"data: {"content": "A linen shirt."}"#).unwrap();
        assert_eq!(content.as_deref(), Some("A linen shirt."));
    }

    #[test]
    fn caption_event_skips_blank_and_done_markers() {
        assert_eq!(parse_caption_event("").unwrap(), None);
        assert_eq!(parse_caption_event("data: [DONE]").unwrap(), None);
    }

    #[test]
    fn malformed_caption_event_is_a_typed_error() {
        let err = parse_caption_event("not json").unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
