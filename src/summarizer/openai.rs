//! Summarization through an OpenAI-compatible chat completions endpoint.
//!
//! Works against OpenAI itself and against local servers that speak the
//! same protocol (Ollama, llama.cpp, vLLM). Requests are non-streaming and
//! use greedy decoding (`temperature: 0`, fixed `seed`).

use async_trait::async_trait;
use std::time::Duration;

use super::{Summarizer, truncate_words};
use crate::error::{ResearchError, Result};

/// Rough upper bound of tokens per English word, for `max_tokens`.
const TOKENS_PER_WORD: usize = 2;

/// Connection settings for [`OpenAiSummarizer`].
#[derive(Debug, Clone)]
pub struct OpenAiSummarizerConfig {
    /// Base URL, e.g. `http://localhost:11434` or `https://api.openai.com`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OpenAiSummarizerConfig {
    /// Create a config for `model` at `base_url` with a 60 s timeout.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Summarizer backed by `/v1/chat/completions`.
pub struct OpenAiSummarizer {
    config: OpenAiSummarizerConfig,
    client: reqwest::Client,
}

impl OpenAiSummarizer {
    /// Build the summarizer and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::ModelUnavailable`] if the client cannot be built.
    pub fn new(config: OpenAiSummarizerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResearchError::ModelUnavailable(format!("HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Build the JSON request body for one summarization call.
pub fn build_summary_request(
    model: &str,
    text: &str,
    max_length: usize,
    min_length: usize,
) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": format!(
                    "You condense web search results into one neutral summary. \
                     Write between {min_length} and {max_length} words of plain prose. \
                     Use only facts stated in the text. Do not add a preamble."
                ),
            },
            { "role": "user", "content": text },
        ],
        "stream": false,
        "temperature": 0.0,
        "seed": 0,
        "max_tokens": max_length.saturating_mul(TOKENS_PER_WORD),
    })
}

/// Pull `choices[0].message.content` out of a completion response.
fn parse_summary_response(body: &serde_json::Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String> {
        let body = build_summary_request(&self.config.model, text, max_length, min_length);

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResearchError::Summarization(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(ResearchError::Summarization(format!(
                "HTTP {}: {detail}",
                status.as_u16()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ResearchError::Summarization(format!("malformed response: {e}")))?;

        let summary = parse_summary_response(&payload).ok_or_else(|| {
            ResearchError::Summarization("response has no choices[0].message.content".into())
        })?;

        Ok(truncate_words(summary.trim(), max_length))
    }
}
