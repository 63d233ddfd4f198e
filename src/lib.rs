// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

pub mod config;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod models;
pub mod retrieval;
pub mod store;
pub mod utils;

pub use config::{ChatConfig, Config, EmbeddingsConfig, FieldKind, FieldSpec, StoreConfig};
pub use embeddings::{EmbeddingProvider, HashEmbedder, RemoteEmbeddingClient, provider_from_config};
pub use error::{Result, StoreError};
pub use llm::ChatClient;
pub use models::{Document, ScoredDocument};
pub use retrieval::{ChainResponse, RetrievalChain, Retriever, SearchKind};
pub use store::{DocumentWriter, SchemaManager, Searcher, StoreClient, VectorStore};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default_config();
        let _embedder = HashEmbedder::new(64);
    }
}
