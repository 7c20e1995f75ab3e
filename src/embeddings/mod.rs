// Embeddings module
// Client for the external embedding service

pub mod openai;

pub use openai::EmbeddingClient;
