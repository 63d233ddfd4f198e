// file: src/store/schema.rs
// description: LanceDB schema management for the documents table
// reference: https://docs.rs/lancedb

use crate::config::{FieldKind, FieldSpec};
use crate::error::Result;
use crate::store::client::StoreClient;
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SchemaManager<'a> {
    client: &'a StoreClient,
}

impl<'a> SchemaManager<'a> {
    pub fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    pub async fn verify(&self) -> Result<bool> {
        let table_name = self.client.table_name();

        if !self.client.table_exists(table_name).await? {
            warn!(
                "Table '{}' does not exist yet (created on first insert)",
                table_name
            );
            return Ok(false);
        }

        info!("Table '{}' exists", table_name);
        Ok(true)
    }

    pub async fn drop_table(&self) -> Result<()> {
        warn!("Dropping documents table");
        self.client.drop_table().await
    }

    /// Arrow schema for the documents table. Core columns first, then one
    /// nullable column per configured extra field.
    pub fn documents_schema(embedding_dim: usize, extra_fields: &[FieldSpec]) -> Arc<Schema> {
        let mut fields = vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("content_hash", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, true),
            // Full metadata map as a JSON blob
            Field::new("metadata", DataType::Utf8, true),
            Field::new("created_at", DataType::UInt64, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                false,
            ),
        ];

        for spec in extra_fields {
            let data_type = match spec.kind {
                FieldKind::Text => DataType::Utf8,
                FieldKind::Integer => DataType::Int64,
            };
            fields.push(Field::new(&spec.name, data_type, true));
        }

        Arc::new(Schema::new(fields))
    }

    /// Column names the table will carry, in schema order.
    pub fn field_names(embedding_dim: usize, extra_fields: &[FieldSpec]) -> Vec<String> {
        Self::documents_schema(embedding_dim, extra_fields)
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldKind;

    #[test]
    fn test_schema_generation() {
        let schema = SchemaManager::documents_schema(384, &[]);
        assert_eq!(schema.fields().len(), 7);

        let embedding_field = schema.field_with_name("embedding").unwrap();
        assert!(matches!(
            embedding_field.data_type(),
            DataType::FixedSizeList(_, 384)
        ));
    }

    #[test]
    fn test_schema_with_extra_fields() {
        let extra = vec![
            FieldSpec {
                name: "source".to_string(),
                kind: FieldKind::Text,
            },
            FieldSpec {
                name: "page".to_string(),
                kind: FieldKind::Integer,
            },
        ];

        let schema = SchemaManager::documents_schema(128, &extra);
        assert_eq!(schema.fields().len(), 9);
        assert_eq!(
            schema.field_with_name("source").unwrap().data_type(),
            &DataType::Utf8
        );
        assert_eq!(
            schema.field_with_name("page").unwrap().data_type(),
            &DataType::Int64
        );
        assert!(schema.field_with_name("page").unwrap().is_nullable());
    }

    #[test]
    fn test_field_names_order() {
        let names = SchemaManager::field_names(64, &[]);
        assert_eq!(names.first().map(String::as_str), Some("id"));
        assert_eq!(names.last().map(String::as_str), Some("embedding"));
    }
}
