// file: src/store/mod.rs
// description: store module exports
// reference: internal module structure

pub mod client;
pub mod ingest;
pub mod schema;
pub mod search;
pub mod vector;

pub use client::StoreClient;
pub use ingest::DocumentWriter;
pub use schema::SchemaManager;
pub use search::Searcher;
pub use vector::VectorStore;
