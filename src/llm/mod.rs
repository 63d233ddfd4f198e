// file: src/llm/mod.rs
// description: LLM client module exports
// reference: internal module structure

pub mod chat;

pub use chat::ChatClient;
