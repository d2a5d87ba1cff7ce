//! Ollama chat client for the reasoning model.
//!
//! The model is a black-box request/response collaborator: one system
//! prompt, one user prompt, one text reply. Sampling parameters are fixed
//! per run and sent with every request.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling the reasoning model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The HTTP request failed (connection, timeout, decode).
    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("Model server returned HTTP {0}")]
    Status(u16),
    /// The model answered with empty content.
    #[error("Model returned empty content")]
    EmptyResponse,
}

/// Sampling knobs passed through to the model server.
///
/// Field names match the Ollama `options` keys, so this struct serializes
/// directly into the request body. Plain numeric knobs; no
/// cross-validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SamplingConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_min_p")]
    pub min_p: f32,
    #[serde(default = "default_presence_penalty")]
    pub presence_penalty: f32,
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,
}

fn default_temperature() -> f32 {
    0.6
}

fn default_top_p() -> f32 {
    0.95
}

fn default_top_k() -> u32 {
    20
}

fn default_min_p() -> f32 {
    0.0
}

fn default_presence_penalty() -> f32 {
    0.0
}

fn default_repeat_penalty() -> f32 {
    1.0
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            min_p: default_min_p(),
            presence_penalty: default_presence_penalty(),
            repeat_penalty: default_repeat_penalty(),
        }
    }
}

/// Trait for the reasoning-model collaborator.
///
/// The orchestrator programs against this seam so tests can substitute a
/// canned (or failing) model.
pub trait ReasoningModel {
    /// Sends one system/user exchange and returns the model's reply text.
    fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    options: SamplingConfig,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Blocking client for an Ollama-compatible `/api/chat` endpoint.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    sampling: SamplingConfig,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            sampling,
        }
    }
}

impl ReasoningModel for OllamaClient {
    fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            stream: false,
            options: self.sampling,
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }

        let body: ChatResponse = response.json()?;
        if body.message.content.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(body.message.content)
    }
}
