//! AI provider abstraction and the OpenAI-backed implementation.
//!
//! The [`AiProvider`] trait bundles the three capabilities the pipeline
//! consumes — embedding generation, chat completion, and a reachability
//! check — behind one explicitly-constructed object. The concrete
//! transport is an implementation detail; the orchestrators only see the
//! trait.
//!
//! # Retry Strategy
//!
//! [`OpenAiProvider`] retries transient failures with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! Retries live here, at the transport edge; the pipeline itself never
//! retries a failed provider call.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::ProviderConfig;

/// One message in a chat completion request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Reachability of the provider's two capabilities.
#[derive(Debug, Clone)]
pub struct ProviderHealth {
    pub embedding_reachable: bool,
    pub chat_reachable: bool,
    pub detail: String,
}

/// Interface to the external embedding and chat services.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Embed a single text. Exactly one outbound call per invocation;
    /// no caching, no batching guarantee.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Run one chat completion over `messages` and return the response
    /// text verbatim.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Probe the provider without side effects.
    async fn health_check(&self) -> ProviderHealth;
}

/// Provider backed by an OpenAI-compatible HTTP API.
pub struct OpenAiProvider {
    config: ProviderConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider from configuration. Requires the
    /// `OPENAI_API_KEY` environment variable.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            api_key,
            client,
        })
    }

    /// POST `body` to `{base_url}{path}` with the retry ladder described
    /// in the module docs, returning the parsed JSON body.
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json().await.context("Invalid JSON response");
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!("API error {}: {}", status, body_text));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Request failed after retries")))
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.config.embed_model,
            "input": text,
        });

        let json = self.post_json("/embeddings", &body).await?;
        parse_embedding_response(&json)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.config.chat_model,
            "messages": messages,
            "temperature": self.config.temperature,
        });

        let json = self.post_json("/chat/completions", &body).await?;
        parse_chat_response(&json)
    }

    async fn health_check(&self) -> ProviderHealth {
        // A single models listing covers both capabilities: they share
        // the credentials and the endpoint.
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await;

        match resp {
            Ok(response) if response.status().is_success() => ProviderHealth {
                embedding_reachable: true,
                chat_reachable: true,
                detail: "All systems operational".to_string(),
            },
            Ok(response) => ProviderHealth {
                embedding_reachable: false,
                chat_reachable: false,
                detail: format!("Provider returned HTTP {}", response.status()),
            },
            Err(e) => ProviderHealth {
                embedding_reachable: false,
                chat_reachable: false,
                detail: format!("Provider unreachable: {}", e),
            },
        }
    }
}

/// Extract the first `data[].embedding` array from an embeddings response.
fn parse_embedding_response(json: &serde_json::Value) -> Result<Vec<f32>> {
    let embedding = json
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|d| d.first())
        .and_then(|item| item.get("embedding"))
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid embeddings response: missing data[0].embedding"))?;

    embedding
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| anyhow::anyhow!("Invalid embeddings response: non-numeric value"))
        })
        .collect()
}

/// Extract `choices[0].message.content` from a chat completion response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Invalid chat response: missing choices[0].message.content"))
}
