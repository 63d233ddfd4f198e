// file: tests/store_test.rs
// description: end-to-end store construction, ingestion, and search tests
// reference: exercised against a temp-dir LanceDB with the offline embedder

use pretty_assertions::assert_eq;
use semantic_store::{
    Document, EmbeddingProvider, FieldKind, FieldSpec, HashEmbedder, SearchKind, StoreConfig,
    StoreError, VectorStore,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

const DIMS: usize = 64;

fn test_config(temp: &TempDir) -> StoreConfig {
    StoreConfig {
        uri: temp.path().to_string_lossy().to_string(),
        table_name: "documents".to_string(),
        batch_size: 2,
        extra_fields: Vec::new(),
    }
}

async fn open_test_store() -> (VectorStore, TempDir) {
    let temp = TempDir::new().unwrap();
    let store = VectorStore::open(test_config(&temp), Arc::new(HashEmbedder::new(DIMS)))
        .await
        .unwrap();
    (store, temp)
}

fn corpus_metadata() -> Vec<BTreeMap<String, String>> {
    (1..=3)
        .map(|i| {
            let mut meta = BTreeMap::new();
            meta.insert("title".to_string(), format!("Title {}", i));
            meta.insert("any_metadata".to_string(), format!("Metadata {}", i));
            meta
        })
        .collect()
}

#[tokio::test]
async fn test_add_texts_and_similarity_search() {
    let (store, _temp) = open_test_store().await;

    let ids = store
        .add_texts(
            vec![
                "Test 1".to_string(),
                "Test 2".to_string(),
                "Test 3".to_string(),
            ],
            Some(corpus_metadata()),
        )
        .await
        .unwrap();

    assert_eq!(ids.len(), 3);

    let results = store.similarity_search("Test 1", 3).await.unwrap();
    assert_eq!(results.len(), 3);

    // The query matching a stored text verbatim should surface it first
    assert_eq!(results[0].content, "Test 1");
    assert_eq!(results[0].title.as_deref(), Some("Title 1"));
    assert_eq!(
        results[0].metadata.get("any_metadata").map(String::as_str),
        Some("Metadata 1")
    );
}

#[tokio::test]
async fn test_from_texts_constructor() {
    let temp = TempDir::new().unwrap();

    let store = VectorStore::from_texts(
        test_config(&temp),
        Arc::new(HashEmbedder::new(DIMS)),
        vec![
            "Test 1".to_string(),
            "Test 2".to_string(),
            "Test 3".to_string(),
        ],
        None,
    )
    .await
    .unwrap();

    let results = store.similarity_search("Test 1", 3).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_similarity_search_with_score_ordering() {
    let (store, _temp) = open_test_store().await;

    store
        .add_texts(
            vec![
                "rust systems programming".to_string(),
                "gardening in spring".to_string(),
                "rust memory safety".to_string(),
            ],
            None,
        )
        .await
        .unwrap();

    let results = store
        .similarity_search_with_score("rust programming", 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for result in &results {
        assert!(result.score > 0.0 && result.score <= 1.0);
        assert!(result.distance.is_some());
    }
}

#[tokio::test]
async fn test_search_by_vector() {
    let (store, _temp) = open_test_store().await;

    store
        .add_texts(vec!["only document".to_string()], None)
        .await
        .unwrap();

    let embedder = HashEmbedder::new(DIMS);
    let vector = embedder.embed("only document").await.unwrap();

    let results = store.similarity_search_by_vector(vector, 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.content, "only document");
}

#[tokio::test]
async fn test_search_empty_store_returns_nothing() {
    let (store, _temp) = open_test_store().await;

    let results = store.similarity_search("anything", 3).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_requesting_more_than_stored() {
    let (store, _temp) = open_test_store().await;

    store
        .add_texts(vec!["one".to_string(), "two".to_string()], None)
        .await
        .unwrap();

    let results = store.similarity_search("one", 10).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_hybrid_search_prefers_lexical_match() {
    let (store, _temp) = open_test_store().await;

    store
        .add_texts(
            vec![
                "compaction strategies for storage engines".to_string(),
                "hybrid retrieval with rank fusion".to_string(),
                "notes on asynchronous runtimes".to_string(),
            ],
            None,
        )
        .await
        .unwrap();

    let results = store
        .hybrid_search("hybrid retrieval rank fusion", 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].document.content,
        "hybrid retrieval with rank fusion"
    );
}

#[tokio::test]
async fn test_zero_limit_rejected() {
    let (store, _temp) = open_test_store().await;

    let err = store.similarity_search("query", 0).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn test_empty_query_rejected() {
    let (store, _temp) = open_test_store().await;

    let err = store.similarity_search("  ", 3).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn test_metadata_length_mismatch_rejected() {
    let (store, _temp) = open_test_store().await;

    let err = store
        .add_texts(
            vec!["one".to_string(), "two".to_string()],
            Some(vec![BTreeMap::new()]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn test_ids_are_content_hashes() {
    let (store, _temp) = open_test_store().await;

    let first = store
        .add_texts(vec!["stable text".to_string()], None)
        .await
        .unwrap();
    let second = store
        .add_texts(vec!["stable text".to_string()], None)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0], Document::from_text("stable text").id);
}

#[tokio::test]
async fn test_extra_fields_reflected_in_schema() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.extra_fields = vec![FieldSpec {
        name: "source".to_string(),
        kind: FieldKind::Text,
    }];

    let store = VectorStore::open(config, Arc::new(HashEmbedder::new(DIMS)))
        .await
        .unwrap();

    let fields = store.fields();
    assert!(fields.contains(&"source".to_string()));
    assert!(fields.contains(&"embedding".to_string()));

    // Ingestion carries the extra column without complaint
    let mut meta = BTreeMap::new();
    meta.insert("source".to_string(), "wiki".to_string());
    store
        .add_texts(vec!["sourced text".to_string()], Some(vec![meta]))
        .await
        .unwrap();

    let results = store.similarity_search("sourced text", 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].metadata.get("source").map(String::as_str),
        Some("wiki")
    );
}

#[tokio::test]
async fn test_count_delete_and_reset() {
    let (store, _temp) = open_test_store().await;
    assert_eq!(store.count().await.unwrap(), 0);

    let ids = store
        .add_texts(vec!["a".to_string(), "b".to_string(), "c".to_string()], None)
        .await
        .unwrap();
    assert_eq!(store.count().await.unwrap(), 3);

    store
        .delete_where(&format!("id = '{}'", ids[0]))
        .await
        .unwrap();
    assert_eq!(store.count().await.unwrap(), 2);

    store.reset().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_retriever_modes() {
    let (store, _temp) = open_test_store().await;

    store
        .add_texts(
            vec![
                "alpha document".to_string(),
                "beta document".to_string(),
                "gamma document".to_string(),
            ],
            None,
        )
        .await
        .unwrap();

    let similarity = store.as_retriever(SearchKind::Similarity, 2);
    let results = similarity.retrieve("alpha document").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document.content, "alpha document");

    let hybrid = store.as_retriever(SearchKind::Hybrid, 2);
    let results = hybrid.retrieve("beta document").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document.content, "beta document");
}
