// LanceDB vector database module
// Stores knowledge chunks with their embeddings and serves similarity search

pub mod knowledge_store;

use serde::{Deserialize, Serialize};

use crate::knowledge::ChunkMetadata;

pub use knowledge_store::KnowledgeStore;

/// A fully embedded chunk ready for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Store-assigned identifier
    pub id: String,
    /// The embedding vector; length must match the store's dimension
    pub vector: Vec<f32>,
    /// Chunk text, kept alongside the vector so search results are
    /// self-describing
    pub content: String,
    pub metadata: ChunkMetadata,
    pub created_at: String,
}

/// A chunk as returned from similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// One similarity-search hit. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    pub chunk: StoredChunk,
    /// Cosine similarity to the query vector, higher is better
    pub similarity: f32,
}
