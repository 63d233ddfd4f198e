// file: src/models/scored.rs
// description: Search result model with similarity scores
// reference: Used for vector and hybrid search results

use crate::models::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,

    /// Similarity score (higher is more similar, typically 0.0-1.0)
    pub score: f32,

    /// Raw distance from the vector index (lower is more similar)
    pub distance: Option<f32>,
}

impl ScoredDocument {
    pub fn new(document: Document, score: f32, distance: Option<f32>) -> Self {
        Self {
            document,
            score,
            distance,
        }
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content = &self.document.content;
        let content_preview = if content.len() > max_content_len {
            let cut = content
                .char_indices()
                .take_while(|(i, _)| *i < max_content_len)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}...", &content[..cut])
        } else {
            content.clone()
        };

        format!(
            "Score: {:.4} | {}\n{}\n",
            self.score,
            self.document.title.as_deref().unwrap_or(&self.document.id),
            content_preview
        )
    }
}
