//! Pipeline configuration.
//!
//! Everything the pipeline needs is carried by one [`PipelineConfig`], loaded
//! from an optional YAML file, patched from CLI flags and the environment, and
//! checked once by [`PipelineConfig::validate`] before any article is touched.
//!
//! ```yaml
//! topic: AI Startups
//! concurrency: 4
//! extractor:
//!   timeout_secs: 15
//! chunking:
//!   max_size: 8000
//!   overlap: 300
//! summary_model:
//!   model: llama3-70b-8192
//!   temperature: 0.3
//! sentiment_model:
//!   model: llama3-8b-8192
//!   temperature: 0.1
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Top-level configuration for one digest run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Topic used as the search query and the digest heading.
    pub topic: String,
    /// Number of articles processed at the same time.
    pub concurrency: usize,
    pub extractor: ExtractorConfig,
    pub chunking: ChunkingConfig,
    pub summary_model: ModelConfig,
    pub sentiment_model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            topic: "AI Startups".to_string(),
            concurrency: 4,
            extractor: ExtractorConfig::default(),
            chunking: ChunkingConfig::default(),
            summary_model: ModelConfig::summarization(),
            sentiment_model: ModelConfig::classification(),
        }
    }
}

/// Page fetching and fallback thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub timeout_secs: u64,
    /// Extracted text shorter than this falls back to the snippet.
    pub min_full_text_chars: usize,
    /// Cleaned snippets shorter than this short-circuit to the unavailable sentinel.
    pub min_snippet_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            min_full_text_chars: 300,
            min_snippet_chars: 100,
        }
    }
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Chunk sizes in characters.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_size: 8000,
            overlap: 300,
        }
    }
}

/// Connection and sampling settings for one OpenAI-compatible model endpoint.
#[derive(Clone, Serialize)]
pub struct ModelConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// A model section as written in the YAML file; unset fields keep the
/// defaults of the role the section configures.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ModelOverrides {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

/// On-disk shape of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    topic: Option<String>,
    concurrency: Option<usize>,
    extractor: Option<ExtractorConfig>,
    chunking: Option<ChunkingConfig>,
    summary_model: ModelOverrides,
    sentiment_model: ModelOverrides,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ModelConfig {
    /// Defaults for the summarization model.
    pub fn summarization() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: "llama3-70b-8192".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }

    /// Defaults for the sentiment model: low temperature, one-word answers.
    pub fn classification() -> Self {
        Self {
            model: "llama3-8b-8192".to_string(),
            temperature: 0.1,
            max_tokens: 8,
            ..Self::summarization()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn overlay(mut self, o: ModelOverrides) -> Self {
        if let Some(v) = o.api_base {
            self.api_base = v;
        }
        if o.api_key.is_some() {
            self.api_key = o.api_key;
        }
        if let Some(v) = o.model {
            self.model = v;
        }
        if let Some(v) = o.temperature {
            self.temperature = v;
        }
        if let Some(v) = o.max_tokens {
            self.max_tokens = v;
        }
        if let Some(v) = o.timeout_secs {
            self.timeout_secs = v;
        }
        self
    }

    fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl PipelineConfig {
    /// Load a YAML config file. Missing fields take their defaults.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, topic = %config.topic, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        let file: ConfigFile = if raw.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        let defaults = Self::default();
        Ok(Self {
            topic: file.topic.unwrap_or(defaults.topic),
            concurrency: file.concurrency.unwrap_or(defaults.concurrency),
            extractor: file.extractor.unwrap_or(defaults.extractor),
            chunking: file.chunking.unwrap_or(defaults.chunking),
            summary_model: defaults.summary_model.overlay(file.summary_model),
            sentiment_model: defaults.sentiment_model.overlay(file.sentiment_model),
        })
    }

    /// Fill in API keys that the config file left empty.
    pub fn apply_api_key(&mut self, key: Option<&str>) {
        let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
            return;
        };
        for model in [&mut self.summary_model, &mut self.sentiment_model] {
            if !model.has_key() {
                model.api_key = Some(key.to_string());
            }
        }
    }

    /// The one fail-fast check run at pipeline assembly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.summary_model.has_key() {
            return Err(ConfigError::MissingApiKey("summary_model"));
        }
        if !self.sentiment_model.has_key() {
            return Err(ConfigError::MissingApiKey("sentiment_model"));
        }
        let ChunkingConfig { max_size, overlap } = self.chunking;
        if max_size == 0 || overlap >= max_size {
            return Err(ConfigError::InvalidChunking { max_size, overlap });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        Ok(())
    }
}
