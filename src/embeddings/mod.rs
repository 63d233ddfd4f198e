// file: src/embeddings/mod.rs
// description: embedding providers module exports
// reference: internal module structure

pub mod hash;
pub mod provider;
pub mod remote;

pub use hash::HashEmbedder;
pub use provider::EmbeddingProvider;
pub use remote::RemoteEmbeddingClient;

use crate::config::EmbeddingsConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Pick a provider from configuration: the remote API when a key is present,
/// the deterministic hash embedder otherwise.
pub fn provider_from_config(config: &EmbeddingsConfig) -> Arc<dyn EmbeddingProvider> {
    match &config.api_key {
        Some(key) => {
            info!("Using remote embeddings ({})", config.model);
            Arc::new(RemoteEmbeddingClient::new(key.clone(), config))
        }
        None => {
            warn!("No embeddings API key configured - using deterministic hash embeddings");
            Arc::new(HashEmbedder::new(config.dimensions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_config_without_key() {
        let config = EmbeddingsConfig::default();
        let provider = provider_from_config(&config);
        assert_eq!(provider.dimensions(), config.dimensions);
    }

    #[test]
    fn test_provider_from_config_with_key() {
        let config = EmbeddingsConfig {
            api_key: Some("test-key".to_string()),
            ..EmbeddingsConfig::default()
        };
        let provider = provider_from_config(&config);
        assert_eq!(provider.dimensions(), config.dimensions);
    }
}
