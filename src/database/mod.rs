// Database module
// Dual store: SQLite for portfolio source records and the generation pointer,
// LanceDB for chunk embeddings

pub mod lancedb;
pub mod sqlite;
