//! OpenAI-compatible streaming backend for the [`Generator`] seam.
//!
//! Issues one chat-completions request with `stream: true` and converts the
//! SSE byte stream into a token stream. Frames may split across network
//! chunks, so a carry-over buffer is kept between chunks.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::generate::{GenerateError, Generator, TokenStream};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_TOKENS: u32 = 1200;
const TEMPERATURE: f32 = 0.2;

/// Streaming chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    /// Read `OPENAI_API_KEY` from the environment; errors when unset so the
    /// caller surfaces a configuration error instead of a silent empty answer.
    pub fn from_env(model: String) -> Result<Self, GenerateError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GenerateError::NotConfigured("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key, model))
    }
}

/// Split complete SSE frames out of `buffer`, returning the decoded tokens.
/// Partial trailing data stays in the buffer for the next chunk.
fn drain_frames(buffer: &mut String) -> Vec<Result<String, GenerateError>> {
    let mut tokens = Vec::new();
    while let Some(pos) = buffer.find("\n\n") {
        let frame: String = buffer.drain(..pos + 2).collect();
        for line in frame.lines() {
            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };
            if data == "[DONE]" {
                continue;
            }
            match serde_json::from_str::<ChatChunk>(data) {
                Ok(chunk) => {
                    let content = chunk
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content);
                    if let Some(token) = content
                        && !token.is_empty()
                    {
                        tokens.push(Ok(token));
                    }
                }
                Err(e) => tokens.push(Err(GenerateError::Decode(e.to_string()))),
            }
        }
    }
    tokens
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(
        &self,
        system_context: &str,
        user_query: &str,
    ) -> Result<TokenStream, GenerateError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_context },
                { "role": "user", "content": user_query },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "stream": true,
        });

        info!(url = %url, model = %self.model, "starting generation stream");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let stream = resp
            .bytes_stream()
            .scan(String::new(), |buffer, chunk| {
                let tokens = match chunk {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        drain_frames(buffer)
                    }
                    Err(e) => vec![Err(GenerateError::Transport(e.to_string()))],
                };
                futures::future::ready(Some(futures::stream::iter(tokens)))
            })
            .flatten();

        Ok(Box::pin(stream))
    }
}
