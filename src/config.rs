//! Configuration types for the research pipeline.

use research_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ResearchError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Web search settings.
    pub search: SearchConfig,
    /// Summarization model settings.
    pub summarizer: SummarizerConfig,
    /// Log filter settings.
    pub logging: LoggingConfig,
}

/// Which summarization backend to load at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizerBackend {
    /// An OpenAI-compatible chat completions endpoint (Ollama, llama.cpp, vLLM, OpenAI).
    #[default]
    OpenaiCompatible,
    /// Built-in lead-sentence extraction; needs no model.
    Extractive,
}

/// Summarization model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Backend to use.
    pub backend: SummarizerBackend,
    /// Base URL of the OpenAI-compatible endpoint, without `/v1`.
    pub base_url: String,
    /// Model identifier served by the endpoint.
    pub model: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Timeout for one summarization request in seconds.
    pub timeout_secs: u64,
    /// Timeout for the startup probe in seconds.
    pub probe_timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            backend: SummarizerBackend::OpenaiCompatible,
            base_url: "http://localhost:11434".to_owned(),
            model: "llama3.2".to_owned(),
            api_key: None,
            timeout_secs: 60,
            probe_timeout_secs: 5,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `deepresearch=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub filter: Option<String>,
}

/// Filter used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_LOG_FILTER: &str = "deepresearch=info,research_search=info";

impl LoggingConfig {
    /// The configured filter, or [`DEFAULT_LOG_FILTER`].
    pub fn filter_or_default(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

impl ResearchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ResearchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ResearchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/deepresearch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("deepresearch")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("deepresearch")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/deepresearch-config/config.toml")
        }
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| ResearchError::Config(format!("[search] {e}")))?;

        let summarizer = &self.summarizer;
        if summarizer.backend == SummarizerBackend::OpenaiCompatible {
            if summarizer.base_url.trim().is_empty() {
                return Err(ResearchError::Config(
                    "[summarizer] base_url must not be empty".into(),
                ));
            }
            if summarizer.model.trim().is_empty() {
                return Err(ResearchError::Config(
                    "[summarizer] model must not be empty".into(),
                ));
            }
        }
        if summarizer.timeout_secs == 0 || summarizer.probe_timeout_secs == 0 {
            return Err(ResearchError::Config(
                "[summarizer] timeouts must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
