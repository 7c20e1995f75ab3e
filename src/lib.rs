use thiserror::Error;

pub type Result<T> = std::result::Result<T, UrsaError>;

#[derive(Error, Debug)]
pub enum UrsaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod chat;
pub mod commands;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod ingest;
pub mod knowledge;
pub mod server;
