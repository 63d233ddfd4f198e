// file: src/retrieval/retriever.rs
// description: retriever abstraction over the vector store
// reference: search-mode selection for downstream chains

use crate::error::Result;
use crate::models::ScoredDocument;
use crate::store::VectorStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Similarity,
    Hybrid,
}

#[derive(Clone)]
pub struct Retriever {
    store: VectorStore,
    kind: SearchKind,
    k: usize,
}

impl Retriever {
    pub fn new(store: VectorStore, kind: SearchKind, k: usize) -> Self {
        Self { store, kind, k }
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredDocument>> {
        match self.kind {
            SearchKind::Similarity => {
                self.store
                    .similarity_search_with_score(query, self.k)
                    .await
            }
            SearchKind::Hybrid => self.store.hybrid_search(query, self.k).await,
        }
    }
}
