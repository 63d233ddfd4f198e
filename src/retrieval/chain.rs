// file: src/retrieval/chain.rs
// description: retrieval-augmented answering chain with source attribution
// reference: stuff-style context assembly over retrieved documents

use crate::error::Result;
use crate::llm::ChatClient;
use crate::models::ScoredDocument;
use crate::retrieval::Retriever;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are a careful assistant. Answer the question using only the \
provided context. If the context does not contain the answer, say so instead of guessing.";

const EMPTY_CONTEXT: &str = "(no matching documents were found)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub answer: String,
    pub sources: Vec<ScoredDocument>,
}

pub struct RetrievalChain {
    retriever: Retriever,
    chat: ChatClient,
    max_context_chars: usize,
}

impl RetrievalChain {
    pub fn new(retriever: Retriever, chat: ChatClient, max_context_chars: usize) -> Self {
        Self {
            retriever,
            chat,
            max_context_chars,
        }
    }

    /// Retrieve, stuff context, and ask the model. Sources are exactly the
    /// documents that made it into the prompt.
    pub async fn answer(&self, question: &str) -> Result<ChainResponse> {
        let retrieved = self.retriever.retrieve(question).await?;
        debug!("Retrieved {} candidate documents", retrieved.len());

        let (context, sources) = build_context(retrieved, self.max_context_chars);

        let user_prompt = format!("Context:\n{}\n\nQuestion: {}", context, question);

        let answer = self.chat.complete(SYSTEM_PROMPT, &user_prompt).await?;

        info!(
            "Answered with {} source documents ({})",
            sources.len(),
            self.chat.model()
        );

        Ok(ChainResponse { answer, sources })
    }
}

/// Concatenate documents into a context block, keeping whole documents only.
/// A document that would push the block past the budget is dropped along
/// with everything after it.
fn build_context(
    retrieved: Vec<ScoredDocument>,
    max_chars: usize,
) -> (String, Vec<ScoredDocument>) {
    let mut context = String::new();
    let mut sources = Vec::new();

    for doc in retrieved {
        let header = doc
            .document
            .title
            .clone()
            .unwrap_or_else(|| doc.document.id.clone());
        let block = format!("--- {}\n{}\n", header, doc.document.content);

        if context.len() + block.len() > max_chars {
            break;
        }

        context.push_str(&block);
        sources.push(doc);
    }

    if sources.is_empty() {
        (EMPTY_CONTEXT.to_string(), sources)
    } else {
        (context, sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn scored(content: &str, title: Option<&str>) -> ScoredDocument {
        ScoredDocument::new(
            Document::new(content.to_string(), title.map(String::from), Default::default()),
            0.9,
            Some(0.1),
        )
    }

    #[test]
    fn test_build_context_includes_whole_documents() {
        let docs = vec![scored("first body", Some("one")), scored("second body", None)];

        let (context, sources) = build_context(docs, 10_000);

        assert!(context.contains("--- one"));
        assert!(context.contains("first body"));
        assert!(context.contains("second body"));
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_build_context_drops_overflow() {
        let docs = vec![
            scored("short", Some("a")),
            scored(&"x".repeat(500), Some("b")),
            scored("after the big one", Some("c")),
        ];

        let (context, sources) = build_context(docs, 60);

        assert!(context.contains("short"));
        assert!(!context.contains("after the big one"));
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_build_context_empty() {
        let (context, sources) = build_context(Vec::new(), 1000);

        assert_eq!(context, EMPTY_CONTEXT);
        assert!(sources.is_empty());
    }
}
