// file: src/store/client.rs
// description: LanceDB client wrapper with connection management
// reference: https://docs.rs/lancedb

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use lancedb::{Connection, Table, connect};
use tracing::{debug, info};

#[derive(Clone)]
pub struct StoreClient {
    connection: Connection,
    config: StoreConfig,
}

impl StoreClient {
    pub async fn new(config: StoreConfig) -> Result<Self> {
        info!("Connecting to LanceDB at {}", config.uri);

        let connection = connect(&config.uri)
            .execute()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self { connection, config })
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub async fn ping(&self) -> Result<bool> {
        debug!("Checking LanceDB connection");

        // Listing tables doubles as a ping
        match self.connection.table_names().execute().await {
            Ok(_) => Ok(true),
            Err(e) => Err(StoreError::Database(format!(
                "LanceDB connection failed: {}",
                e
            ))),
        }
    }

    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == table_name))
    }

    pub async fn get_table(&self, table_name: &str) -> Result<Table> {
        self.connection
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| {
                StoreError::Database(format!("Failed to open table {}: {}", table_name, e))
            })
    }

    pub async fn get_document_count(&self) -> Result<u64> {
        if !self.table_exists(&self.config.table_name).await? {
            return Ok(0);
        }

        let table = self.get_table(&self.config.table_name).await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Delete documents matching a SQL predicate, e.g. `id = 'abc'`.
    pub async fn delete_where(&self, predicate: &str) -> Result<()> {
        if !self.table_exists(&self.config.table_name).await? {
            info!("Table does not exist, nothing to delete");
            return Ok(());
        }

        let table = self.get_table(&self.config.table_name).await?;

        info!("Deleting documents with predicate: {}", predicate);

        table.delete(predicate).await.map_err(|e| {
            StoreError::Database(format!("Failed to delete with '{}': {}", predicate, e))
        })?;

        Ok(())
    }

    pub async fn drop_table(&self) -> Result<()> {
        let table_name = &self.config.table_name;

        if self.table_exists(table_name).await? {
            self.connection.drop_table(table_name).await.map_err(|e| {
                StoreError::Database(format!("Failed to drop table {}: {}", table_name, e))
            })?;
            info!("Dropped table: {}", table_name);
        }

        Ok(())
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
