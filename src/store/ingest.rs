// file: src/store/ingest.rs
// description: batch embedding and insertion of documents into LanceDB
// reference: https://docs.rs/lancedb

use crate::config::{FieldKind, FieldSpec};
use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, StoreError};
use crate::models::Document;
use crate::store::client::StoreClient;
use crate::store::schema::SchemaManager;
use arrow_array::{
    Array, ArrayRef, FixedSizeListArray, Float32Array, Int64Array, RecordBatch,
    RecordBatchIterator, StringArray, UInt64Array,
};
use arrow_schema::Field;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DocumentWriter<'a> {
    client: &'a StoreClient,
    provider: Arc<dyn EmbeddingProvider>,
}

impl<'a> DocumentWriter<'a> {
    pub fn new(client: &'a StoreClient, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { client, provider }
    }

    /// Embed and insert documents, creating the table on first use.
    /// Returns the ids of the inserted documents in input order.
    pub async fn insert_documents(&self, documents: &[Document]) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let dim = self.provider.dimensions();
        let extra_fields = self.client.config().extra_fields.clone();
        let schema = SchemaManager::documents_schema(dim, &extra_fields);

        let mut ids = Vec::with_capacity(documents.len());

        for chunk in documents.chunks(self.client.batch_size()) {
            let texts: Vec<String> = chunk.iter().map(|d| d.content.clone()).collect();
            let embeddings = self.provider.embed_batch(&texts).await?;

            if embeddings.len() != chunk.len() {
                return Err(StoreError::Embedding(format!(
                    "Provider returned {} embeddings for {} texts",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            for embedding in &embeddings {
                if embedding.len() != dim {
                    return Err(StoreError::DimensionMismatch {
                        expected: dim,
                        actual: embedding.len(),
                    });
                }
            }

            let record_batch =
                Self::create_record_batch(schema.clone(), chunk, &embeddings, &extra_fields)?;

            let table_name = self.client.table_name();

            if !self.client.table_exists(table_name).await? {
                self.client
                    .get_connection()
                    .create_table(
                        table_name,
                        RecordBatchIterator::new(vec![Ok(record_batch)], schema.clone()),
                    )
                    .execute()
                    .await
                    .map_err(|e| StoreError::Database(format!("Failed to create table: {}", e)))?;
                info!("Created new table: {}", table_name);
            } else {
                let table = self.client.get_table(table_name).await?;
                table
                    .add(RecordBatchIterator::new(
                        vec![Ok(record_batch)],
                        schema.clone(),
                    ))
                    .execute()
                    .await
                    .map_err(|e| {
                        StoreError::Database(format!("Failed to insert documents: {}", e))
                    })?;
            }

            debug!("Inserted batch of {} documents", chunk.len());
            ids.extend(chunk.iter().map(|d| d.id.clone()));
        }

        Ok(ids)
    }

    fn create_record_batch(
        schema: Arc<arrow_schema::Schema>,
        documents: &[Document],
        embeddings: &[Vec<f32>],
        extra_fields: &[FieldSpec],
    ) -> Result<RecordBatch> {
        let ids: StringArray = documents.iter().map(|doc| Some(doc.id.clone())).collect();

        let contents: StringArray = documents
            .iter()
            .map(|doc| Some(doc.content.clone()))
            .collect();

        let content_hashes: StringArray =
            documents.iter().map(|doc| Some(doc.id.clone())).collect();

        let titles: StringArray = documents.iter().map(|doc| doc.title.clone()).collect();

        let metadata_blobs: StringArray =
            documents.iter().map(|doc| doc.metadata_json()).collect();

        let created_ats: UInt64Array = documents.iter().map(|doc| Some(doc.created_at)).collect();

        let embedding_values: Float32Array = embeddings
            .iter()
            .flat_map(|emb| emb.iter().copied())
            .collect();

        let embedding_field = Arc::new(Field::new(
            "item",
            embedding_values.data_type().clone(),
            true,
        ));
        let embedding_list = FixedSizeListArray::try_new(
            embedding_field,
            embeddings[0].len() as i32,
            Arc::new(embedding_values),
            None,
        )
        .map_err(|e| StoreError::Database(format!("Failed to create embedding array: {}", e)))?;

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(ids),
            Arc::new(contents),
            Arc::new(content_hashes),
            Arc::new(titles),
            Arc::new(metadata_blobs),
            Arc::new(created_ats),
            Arc::new(embedding_list),
        ];

        // Extra field columns are populated from document metadata by name
        for spec in extra_fields {
            let column: ArrayRef = match spec.kind {
                FieldKind::Text => {
                    let values: StringArray = documents
                        .iter()
                        .map(|doc| doc.metadata.get(&spec.name).cloned())
                        .collect();
                    Arc::new(values)
                }
                FieldKind::Integer => {
                    let values: Int64Array = documents
                        .iter()
                        .map(|doc| {
                            doc.metadata
                                .get(&spec.name)
                                .and_then(|v| v.parse::<i64>().ok())
                        })
                        .collect();
                    Arc::new(values)
                }
            };
            columns.push(column);
        }

        RecordBatch::try_new(schema, columns)
            .map_err(|e| StoreError::Database(format!("Failed to create record batch: {}", e)))
    }
}
