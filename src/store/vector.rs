// file: src/store/vector.rs
// description: high-level vector store facade over client, ingest, and search
// reference: construction, ingestion, and retrieval entry points

use crate::config::StoreConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::models::{Document, ScoredDocument};
use crate::retrieval::{Retriever, SearchKind};
use crate::store::client::StoreClient;
use crate::store::ingest::DocumentWriter;
use crate::store::schema::SchemaManager;
use crate::store::search::{Searcher, candidate_pool, fuse_hybrid};
use crate::utils::Validator;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct VectorStore {
    client: StoreClient,
    provider: Arc<dyn EmbeddingProvider>,
}

impl VectorStore {
    /// Connect to the database. The documents table is created lazily on
    /// first insert.
    pub async fn open(config: StoreConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let client = StoreClient::new(config).await?;
        client.ping().await?;

        Ok(Self { client, provider })
    }

    /// Construct a store and ingest an initial corpus in one step.
    pub async fn from_texts(
        config: StoreConfig,
        provider: Arc<dyn EmbeddingProvider>,
        texts: Vec<String>,
        metadatas: Option<Vec<BTreeMap<String, String>>>,
    ) -> Result<Self> {
        let store = Self::open(config, provider).await?;
        store.add_texts(texts, metadatas).await?;
        Ok(store)
    }

    /// Column names of the documents table, in schema order.
    pub fn fields(&self) -> Vec<String> {
        SchemaManager::field_names(
            self.provider.dimensions(),
            &self.client.config().extra_fields,
        )
    }

    pub fn table_name(&self) -> &str {
        self.client.table_name()
    }

    /// Embed and store texts with optional per-text metadata. Returns the
    /// document ids in input order.
    pub async fn add_texts(
        &self,
        texts: Vec<String>,
        metadatas: Option<Vec<BTreeMap<String, String>>>,
    ) -> Result<Vec<String>> {
        if let Some(metas) = &metadatas {
            Validator::validate_matching_lengths(texts.len(), metas.len())?;
        }

        let documents: Vec<Document> = match metadatas {
            Some(metas) => texts
                .into_iter()
                .zip(metas)
                .map(|(text, mut meta)| {
                    let title = meta.remove("title");
                    Document::new(text, title, meta)
                })
                .collect(),
            None => texts.into_iter().map(Document::from_text).collect(),
        };

        self.add_documents(&documents).await
    }

    pub async fn add_documents(&self, documents: &[Document]) -> Result<Vec<String>> {
        for doc in documents {
            Validator::validate_content_not_empty(&doc.content)?;
        }

        let writer = DocumentWriter::new(&self.client, Arc::clone(&self.provider));
        let ids = writer.insert_documents(documents).await?;

        info!("Added {} documents to {}", ids.len(), self.table_name());
        Ok(ids)
    }

    /// Delete documents matching a SQL predicate, e.g. `id = 'abc'`.
    pub async fn delete_where(&self, predicate: &str) -> Result<()> {
        self.client.delete_where(predicate).await
    }

    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let scored = self.similarity_search_with_score(query, k).await?;
        Ok(scored.into_iter().map(|s| s.document).collect())
    }

    pub async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        Validator::validate_query(query)?;
        Validator::validate_limit(k)?;

        let embedding = self.provider.embed(query).await?;
        self.similarity_search_by_vector(embedding, k).await
    }

    pub async fn similarity_search_by_vector(
        &self,
        embedding: Vec<f32>,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        Validator::validate_limit(k)?;

        Searcher::new(&self.client).vector_search(embedding, k).await
    }

    /// Vector recall fused with lexical overlap via reciprocal rank fusion.
    pub async fn hybrid_search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        Validator::validate_query(query)?;
        Validator::validate_limit(k)?;

        let embedding = self.provider.embed(query).await?;
        let candidates = Searcher::new(&self.client)
            .vector_search(embedding, candidate_pool(k))
            .await?;

        Ok(fuse_hybrid(query, candidates, k))
    }

    pub fn as_retriever(&self, kind: SearchKind, k: usize) -> Retriever {
        Retriever::new(self.clone(), kind, k)
    }

    pub async fn count(&self) -> Result<u64> {
        self.client.get_document_count().await
    }

    /// Drop the documents table. It is recreated on the next insert.
    pub async fn reset(&self) -> Result<()> {
        SchemaManager::new(&self.client).drop_table().await
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }
}
