// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, StoreError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub store: StoreConfig,
    pub embeddings: EmbeddingsConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub uri: String,
    pub table_name: String,
    pub batch_size: usize,
    #[serde(default)]
    pub extra_fields: Vec<FieldSpec>,
}

/// Extra scalar metadata column carried by the documents table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Integer,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_context_chars: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "data/semantic_store".to_string(),
            table_name: "documents".to_string(),
            batch_size: 100,
            extra_fields: Vec::new(),
        }
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_context_chars: 12_000,
        }
    }
}

/// Column names owned by the core schema; extra fields may not shadow them.
const RESERVED_FIELD_NAMES: &[&str] = &[
    "id",
    "content",
    "content_hash",
    "title",
    "metadata",
    "created_at",
    "embedding",
    "_distance",
];

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SEMANTIC_STORE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<()> {
        if self.store.batch_size == 0 {
            return Err(StoreError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        if self.embeddings.dimensions == 0 {
            return Err(StoreError::Config(
                "embedding dimensions must be greater than 0".to_string(),
            ));
        }

        for url in [&self.embeddings.base_url, &self.chat.base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(StoreError::Config(format!("Invalid base URL: {}", url)));
            }
        }

        for field in &self.store.extra_fields {
            if field.name.trim().is_empty() {
                return Err(StoreError::Config(
                    "extra field name cannot be empty".to_string(),
                ));
            }
            if RESERVED_FIELD_NAMES.contains(&field.name.as_str()) {
                return Err(StoreError::Config(format!(
                    "extra field name '{}' is reserved",
                    field.name
                )));
            }
        }

        Ok(())
    }
}
