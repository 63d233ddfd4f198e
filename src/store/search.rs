// file: src/store/search.rs
// description: vector search execution and hybrid rank fusion
// reference: https://docs.rs/lancedb

use crate::embeddings::hash::tokenize;
use crate::error::{Result, StoreError};
use crate::models::{Document, ScoredDocument};
use crate::store::client::StoreClient;
use arrow_array::{Array, Float32Array, StringArray, UInt64Array};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Reciprocal rank fusion constant. 60 is the conventional value; it keeps
/// low ranks from dominating the fused score.
const RRF_K: f32 = 60.0;

pub struct Searcher<'a> {
    client: &'a StoreClient,
}

impl<'a> Searcher<'a> {
    pub fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Nearest-neighbor search by embedding. Results are ordered by
    /// similarity, highest first.
    pub async fn vector_search(
        &self,
        query_embedding: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>> {
        if !self.client.table_exists(self.client.table_name()).await? {
            warn!("Table does not exist, returning empty results");
            return Ok(Vec::new());
        }

        let table = self.client.get_table(self.client.table_name()).await?;

        debug!("Performing vector search with limit {}", limit);

        let query = table
            .vector_search(query_embedding)
            .map_err(|e| StoreError::Database(format!("Failed to create vector search: {}", e)))?
            .limit(limit);

        let mut results_stream = query
            .execute()
            .await
            .map_err(|e| StoreError::Database(format!("Vector search failed: {}", e)))?;

        let mut results = Vec::new();

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| StoreError::Database(format!("Failed to read result batch: {}", e)))?;

            let ids = string_column(&batch, "id")?;
            let contents = string_column(&batch, "content")?;
            let titles = batch
                .column_by_name("title")
                .and_then(|col| col.as_any().downcast_ref::<StringArray>());
            let metadata_blobs = batch
                .column_by_name("metadata")
                .and_then(|col| col.as_any().downcast_ref::<StringArray>());
            let created_ats = batch
                .column_by_name("created_at")
                .and_then(|col| col.as_any().downcast_ref::<UInt64Array>());

            // LanceDB returns the distance in a dedicated column
            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

            for i in 0..batch.num_rows() {
                let title = titles.and_then(|arr| {
                    if arr.is_null(i) {
                        None
                    } else {
                        Some(arr.value(i).to_string())
                    }
                });

                let metadata: BTreeMap<String, String> = metadata_blobs
                    .and_then(|arr| {
                        if arr.is_null(i) {
                            None
                        } else {
                            serde_json::from_str(arr.value(i)).ok()
                        }
                    })
                    .unwrap_or_default();

                let created_at = created_ats.map(|arr| arr.value(i)).unwrap_or(0);

                let document = Document {
                    id: ids.value(i).to_string(),
                    content: contents.value(i).to_string(),
                    title,
                    metadata,
                    created_at,
                };

                // Convert distance to similarity (lower distance = higher similarity)
                let (score, distance) = match distances {
                    Some(arr) => {
                        let dist = arr.value(i);
                        (1.0 / (1.0 + dist), Some(dist))
                    }
                    None => (1.0, None),
                };

                results.push(ScoredDocument::new(document, score, distance));
            }
        }

        info!("Vector search returned {} results", results.len());
        Ok(results)
    }
}

/// Candidate pool size for hybrid search: wider than `k` so lexical evidence
/// can promote documents the vector ranking placed lower.
pub(crate) fn candidate_pool(k: usize) -> usize {
    (k * 4).max(20)
}

/// Fuse the vector ranking with a lexical token-overlap ranking using
/// reciprocal rank fusion. `candidates` must arrive in vector-rank order.
pub(crate) fn fuse_hybrid(
    query: &str,
    candidates: Vec<ScoredDocument>,
    k: usize,
) -> Vec<ScoredDocument> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let query_tokens: BTreeSet<String> = tokenize(query).collect();

    let lexical_scores: Vec<f32> = candidates
        .iter()
        .map(|c| lexical_overlap(&query_tokens, &c.document.content))
        .collect();

    // Rank positions per signal; ties in lexical score keep vector order
    let mut lexical_order: Vec<usize> = (0..candidates.len()).collect();
    lexical_order.sort_by(|&a, &b| {
        lexical_scores[b]
            .partial_cmp(&lexical_scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut lexical_rank = vec![0usize; candidates.len()];
    for (rank, &idx) in lexical_order.iter().enumerate() {
        lexical_rank[idx] = rank;
    }

    let mut fused: Vec<(f32, ScoredDocument)> = candidates
        .into_iter()
        .enumerate()
        .map(|(vector_rank, mut doc)| {
            let score = 1.0 / (RRF_K + vector_rank as f32 + 1.0)
                + 1.0 / (RRF_K + lexical_rank[vector_rank] as f32 + 1.0);
            doc.score = score;
            (score, doc)
        })
        .collect();

    fused.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    fused.into_iter().take(k).map(|(_, doc)| doc).collect()
}

/// Fraction of query tokens present in the document.
fn lexical_overlap(query_tokens: &BTreeSet<String>, content: &str) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let doc_tokens: BTreeSet<String> = tokenize(content).collect();
    let hits = query_tokens.intersection(&doc_tokens).count();

    hits as f32 / query_tokens.len() as f32
}

fn string_column<'b>(
    batch: &'b arrow_array::RecordBatch,
    name: &str,
) -> Result<&'b StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::Database(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| StoreError::Database(format!("Invalid '{}' column type", name)))
}
