//! One-shot availability probe for a summarization endpoint.
//!
//! Run once at startup by [`SummarizerHandle::initialize`]; the outcome
//! is cached in the handle and never re-probed per request.
//!
//! [`SummarizerHandle::initialize`]: super::SummarizerHandle::initialize

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Status of a summarization endpoint after probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Endpoint answered with a model list.
    Available {
        /// Model identifiers advertised by the endpoint.
        models: Vec<String>,
        /// Round-trip latency in milliseconds.
        latency_ms: u64,
    },
    /// Connection refused or host unreachable.
    NotRunning,
    /// No response within the probe timeout.
    Timeout,
    /// Endpoint responded with an HTTP error status.
    Unhealthy {
        /// HTTP status code.
        status_code: u16,
        /// Start of the response body.
        message: String,
    },
    /// Endpoint responded but the payload is not a recognized model list.
    IncompatibleResponse {
        /// Why the response was rejected.
        detail: String,
    },
}

impl ProbeStatus {
    /// Returns `true` if the endpoint answered with a model list.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Whether `model` is served. Ollama tags (`llama3.2:latest`) match
    /// their bare name. An empty model list is taken as "serves anything".
    pub fn serves(&self, model: &str) -> bool {
        match self {
            Self::Available { models, .. } => {
                models.is_empty()
                    || models.iter().any(|id| {
                        id == model
                            || id
                                .strip_prefix(model)
                                .is_some_and(|rest| rest.starts_with(':'))
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { models, latency_ms } => {
                write!(f, "available ({latency_ms}ms, {} model(s))", models.len())
            }
            Self::NotRunning => write!(f, "not running (connection refused)"),
            Self::Timeout => write!(f, "timeout (no response)"),
            Self::Unhealthy {
                status_code,
                message,
            } => write!(f, "unhealthy (HTTP {status_code}): {message}"),
            Self::IncompatibleResponse { detail } => write!(f, "incompatible response: {detail}"),
        }
    }
}

/// Probes an OpenAI-compatible or Ollama endpoint for its model list.
pub struct EndpointProbe {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl EndpointProbe {
    /// Create a probe for `base_url` with the given timeout.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            api_key,
            client,
        }
    }

    /// Query `/v1/models`, then Ollama's `/api/tags` if that fails.
    ///
    /// Never retries: a probe is a single attempt per endpoint path.
    pub async fn probe(&self) -> ProbeStatus {
        let base = self.base_url.trim_end_matches('/');

        let start = Instant::now();
        let v1 = self.get(&format!("{base}/v1/models")).await;
        if let Ok(resp) = v1 {
            if resp.status().is_success() {
                let latency_ms = start.elapsed().as_millis() as u64;
                let body = resp.text().await.unwrap_or_default();
                if let Some(models) = parse_openai_models(&body) {
                    return ProbeStatus::Available { models, latency_ms };
                }
            }
        }

        let start = Instant::now();
        match self.get(&format!("{base}/api/tags")).await {
            Ok(resp) if resp.status().is_success() => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let body = resp.text().await.unwrap_or_default();
                match parse_ollama_tags(&body) {
                    Some(models) => ProbeStatus::Available { models, latency_ms },
                    None => ProbeStatus::IncompatibleResponse {
                        detail: "neither /v1/models nor /api/tags returned a model list".into(),
                    },
                }
            }
            Ok(resp) => {
                let status_code = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                ProbeStatus::Unhealthy {
                    status_code,
                    message: body.chars().take(200).collect(),
                }
            }
            Err(e) => classify_reqwest_error(&e),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request.send().await
    }
}

fn classify_reqwest_error(err: &reqwest::Error) -> ProbeStatus {
    if err.is_timeout() {
        ProbeStatus::Timeout
    } else {
        ProbeStatus::NotRunning
    }
}

/// `{"data": [{"id": "..."}]}`
fn parse_openai_models(body: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let data = value.get("data")?.as_array()?;
    Some(
        data.iter()
            .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
            .map(str::to_owned)
            .collect(),
    )
}

/// `{"models": [{"name": "..."}]}`
fn parse_ollama_tags(body: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let models = value.get("models")?.as_array()?;
    Some(
        models
            .iter()
            .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
            .map(str::to_owned)
            .collect(),
    )
}
