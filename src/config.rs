use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk window in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Bytes of overlap carried between consecutive chunks.
    #[serde(default = "default_overlap_size")]
    pub overlap_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap_size: default_overlap_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}
fn default_overlap_size() -> usize {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Maximum number of chunks returned per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Minimum cosine similarity a chunk must reach to be considered
    /// relevant. Deliberately a config value, not a constant.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

fn default_top_k() -> usize {
    5
}
fn default_min_score() -> f32 {
    0.3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embed_model")]
    pub embed_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Embedding vector dimensionality; every vector entering or leaving
    /// the system must match it exactly.
    #[serde(default = "default_dims")]
    pub dims: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            embed_model: default_embed_model(),
            chat_model: default_chat_model(),
            dims: default_dims(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_embed_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_dims() -> usize {
    1536
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout_secs() -> u64 {
    60
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if !(0.0..=1.0).contains(&config.retrieval.min_score) {
        anyhow::bail!("retrieval.min_score must be in [0.0, 1.0]");
    }

    if config.provider.dims == 0 {
        anyhow::bail!("provider.dims must be > 0");
    }

    if config.provider.embed_model.is_empty() || config.provider.chat_model.is_empty() {
        anyhow::bail!("provider.embed_model and provider.chat_model must be set");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            db: DbConfig {
                path: PathBuf::from("/tmp/docqa.sqlite"),
            },
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            provider: ProviderConfig::default(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = base_config();
        config.chunking.chunk_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_min_score_out_of_range_rejected() {
        let mut config = base_config();
        config.retrieval.min_score = 1.5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_dims_rejected() {
        let mut config = base_config();
        config.provider.dims = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_minimal_toml_parses_with_defaults() {
        let config: Config = toml::from_str("[db]\npath = \"data/docqa.sqlite\"\n").unwrap();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap_size, 200);
        assert_eq!(config.retrieval.top_k, 5);
        assert!((config.retrieval.min_score - 0.3).abs() < 1e-6);
        assert_eq!(config.provider.dims, 1536);
    }
}
