// file: src/models/document.rs
// description: core document model with content-hash identity
// reference: internal data structures

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub title: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub created_at: u64,
}

impl Document {
    pub fn new(content: String, title: Option<String>, metadata: BTreeMap<String, String>) -> Self {
        let id = Self::compute_hash(&content);
        let created_at = Utc::now().timestamp().max(0) as u64;

        Self {
            id,
            content,
            title,
            metadata,
            created_at,
        }
    }

    pub fn from_text(content: impl Into<String>) -> Self {
        Self::new(content.into(), None, BTreeMap::new())
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn metadata_json(&self) -> Option<String> {
        if self.metadata.is_empty() {
            None
        } else {
            serde_json::to_string(&self.metadata).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::from_text("Test content");

        assert!(!doc.id.is_empty());
        assert_eq!(doc.content, "Test content");
        assert!(doc.title.is_none());
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_hash_identity() {
        let a = Document::from_text("same text");
        let b = Document::from_text("same text");
        let c = Document::from_text("other text");

        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_metadata_json() {
        let mut metadata = BTreeMap::new();
        metadata.insert("title".to_string(), "Title 1".to_string());
        metadata.insert("any_key".to_string(), "Value 1".to_string());

        let doc = Document::new("body".to_string(), None, metadata);
        let json = doc.metadata_json().unwrap();

        assert!(json.contains("Title 1"));
        assert!(json.contains("any_key"));

        let empty = Document::from_text("body");
        assert!(empty.metadata_json().is_none());
    }
}
