
use super::{EmbeddingRecord, RetrievalResult, StoredChunk};
use crate::config::Config;
use crate::database::sqlite::Database;
use crate::knowledge::ChunkKind;
use crate::{Result, UrsaError};
use arrow::array::{FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType, Table};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const TABLE_NAME: &str = "knowledge_base";

/// Vector store for knowledge chunks, backed by LanceDB.
///
/// Ingestion is generation-based: a full-replace run writes every record
/// under a fresh generation id, flips the pointer held in SQLite, then
/// garbage-collects prior generations. Search only ever reads the pointed-at
/// generation, so concurrent readers never observe an empty or partially
/// written knowledge base.
pub struct KnowledgeStore {
    connection: Connection,
    state: Database,
    table_name: String,
    dimension: usize,
}

impl KnowledgeStore {
    /// Open (or create) the store. Fails if an existing table was built with
    /// a different embedding dimension than the configuration asks for;
    /// mixing dimensions silently degrades similarity quality, so the
    /// mismatch must surface here.
    #[inline]
    pub async fn new(config: &Config, state: Database) -> Result<Self> {
        let db_path = config.vector_database_path();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                UrsaError::Database(format!("Failed to create vector database directory: {e}"))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to connect to LanceDB: {e}")))?;

        let store = Self {
            connection,
            state,
            table_name: TABLE_NAME.to_string(),
            dimension: config.openai.embedding_dimension as usize,
        };

        store.initialize_table().await?;

        info!(
            "Knowledge store initialized ({} dimensions)",
            store.dimension
        );
        Ok(store)
    }

    async fn initialize_table(&self) -> Result<()> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to list tables: {e}")))?;

        if table_names.contains(&self.table_name) {
            let existing = self.detect_existing_vector_dimension().await?;
            if existing != self.dimension {
                return Err(UrsaError::Config(format!(
                    "Embedding dimension mismatch: store was built with {} dimensions but configuration specifies {}; fix the configuration or re-create the store",
                    existing, self.dimension
                )));
            }
            return Ok(());
        }

        let schema = self.create_schema();
        self.connection
            .create_empty_table(&self.table_name, schema)
            .execute()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to create table: {e}")))?;

        info!(
            "Knowledge base table created with {} dimensions",
            self.dimension
        );
        Ok(())
    }

    async fn detect_existing_vector_dimension(&self) -> Result<usize> {
        let table = self.open_table().await?;

        let schema = table
            .schema()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to get table schema: {e}")))?;

        for field in schema.fields() {
            if field.name() == "vector" {
                if let DataType::FixedSizeList(_, size) = field.data_type() {
                    return Ok(*size as usize);
                }
            }
        }

        Err(UrsaError::Database(
            "Could not find vector column or determine dimension".to_string(),
        ))
    }

    fn create_schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.dimension as i32,
                ),
                false,
            ),
            Field::new("content", DataType::Utf8, false),
            Field::new("metadata", DataType::Utf8, false),
            Field::new("generation", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    async fn open_table(&self) -> Result<Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to open table: {e}")))
    }

    /// Replace the entire knowledge base with a new chunk set.
    ///
    /// Every vector is validated against the store dimension up front; a
    /// single mismatch rejects the whole batch before anything is written.
    /// The old generation stays live until the new one is fully inserted and
    /// the pointer has flipped.
    #[inline]
    pub async fn replace_all(&self, records: Vec<EmbeddingRecord>) -> Result<String> {
        for record in &records {
            if record.vector.len() != self.dimension {
                return Err(UrsaError::Database(format!(
                    "Rejecting chunk '{}': embedding has {} dimensions, store requires {}",
                    record.id,
                    record.vector.len(),
                    self.dimension
                )));
            }
        }

        let generation = Uuid::new_v4().to_string();
        debug!(
            "Writing {} chunks under generation {}",
            records.len(),
            generation
        );

        let table = self.open_table().await?;

        if !records.is_empty() {
            let record_batch = self.create_record_batch(&records, &generation)?;
            let schema = record_batch.schema();
            let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
            table
                .add(reader)
                .execute()
                .await
                .map_err(|e| UrsaError::Database(format!("Failed to insert chunks: {e}")))?;
        }

        // Readers switch to the new generation here, in one step
        self.state
            .set_current_generation(&generation)
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to flip generation pointer: {e}")))?;

        // Garbage-collect prior generations
        table
            .delete(&format!("generation != '{generation}'"))
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to delete old generations: {e}")))?;

        info!(
            "Knowledge base replaced: {} chunks, generation {}",
            records.len(),
            generation
        );
        Ok(generation)
    }

    fn create_record_batch(
        &self,
        records: &[EmbeddingRecord],
        generation: &str,
    ) -> Result<RecordBatch> {
        let len = records.len();

        let mut ids = Vec::with_capacity(len);
        let mut contents = Vec::with_capacity(len);
        let mut metadatas = Vec::with_capacity(len);
        let mut generations = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * self.dimension);

        for record in records {
            ids.push(record.id.as_str());
            contents.push(record.content.as_str());
            metadatas.push(
                serde_json::to_string(&record.metadata)
                    .map_err(|e| UrsaError::Database(format!("Failed to serialize metadata: {e}")))?,
            );
            generations.push(generation);
            created_ats.push(record.created_at.as_str());
            flat_values.extend_from_slice(&record.vector);
        }

        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array = FixedSizeListArray::try_new(
            field,
            self.dimension as i32,
            Arc::new(values_array),
            None,
        )
        .map_err(|e| UrsaError::Database(format!("Failed to create vector array: {e}")))?;

        let schema = self.create_schema();
        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(metadatas)),
            Arc::new(StringArray::from(generations)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| UrsaError::Database(format!("Failed to create record batch: {e}")))
    }

    /// Cosine-similarity search over the current generation.
    ///
    /// Returns at most `top_k` chunks with similarity >= `threshold`,
    /// ordered by similarity descending. Zero matches is a normal outcome,
    /// not an error. A query vector of the wrong dimension is a
    /// configuration error and fails loudly.
    #[inline]
    pub async fn search(
        &self,
        query_vector: &[f32],
        threshold: f32,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>> {
        if query_vector.len() != self.dimension {
            return Err(UrsaError::Database(format!(
                "Query embedding has {} dimensions, store requires {}",
                query_vector.len(),
                self.dimension
            )));
        }

        let Some(generation) = self
            .state
            .current_generation()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to read generation pointer: {e}")))?
        else {
            debug!("No knowledge-base generation published yet, returning no results");
            return Ok(Vec::new());
        };

        debug!(
            "Searching generation {} (threshold {}, top_k {})",
            generation, threshold, top_k
        );

        let table = self.open_table().await?;

        let query = table
            .vector_search(query_vector)
            .map_err(|e| UrsaError::Database(format!("Failed to create vector search: {e}")))?
            .column("vector")
            .distance_type(DistanceType::Cosine)
            .only_if(format!("generation = '{generation}'"))
            .limit(top_k);

        let mut stream = query
            .execute()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to execute search: {e}")))?;

        let mut results = Vec::new();
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to read result stream: {e}")))?
        {
            results.extend(Self::parse_search_batch(&batch)?);
        }

        results.retain(|r| r.similarity >= threshold);
        // LanceDB already returns nearest-first; sort defensively so the
        // ordering contract never depends on backend behavior
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        debug!("Search returned {} results above threshold", results.len());
        Ok(results)
    }

    fn parse_search_batch(batch: &RecordBatch) -> Result<Vec<RetrievalResult>> {
        let ids = string_column(batch, "id")?;
        let contents = string_column(batch, "content")?;
        let metadatas = string_column(batch, "metadata")?;

        let distances = batch
            .column_by_name("_distance")
            .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

        let mut results = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let metadata = serde_json::from_str(metadatas.value(row)).map_err(|e| {
                UrsaError::Database(format!("Failed to parse stored chunk metadata: {e}"))
            })?;

            // Cosine distance in [0, 2]; similarity = 1 - distance
            let distance = distances.map_or(0.0, |d| d.value(row));
            let similarity = 1.0 - distance;

            results.push(RetrievalResult {
                chunk: StoredChunk {
                    id: ids.value(row).to_string(),
                    content: contents.value(row).to_string(),
                    metadata,
                },
                similarity,
            });
        }

        Ok(results)
    }

    /// Chunk counts per kind in the current generation, for the status
    /// report. Kinds with zero chunks are omitted.
    #[inline]
    pub async fn count_chunks_by_kind(&self) -> Result<Vec<(ChunkKind, u64)>> {
        let Some(generation) = self
            .state
            .current_generation()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to read generation pointer: {e}")))?
        else {
            return Ok(Vec::new());
        };

        let table = self.open_table().await?;
        let mut counts = Vec::new();

        for kind in ChunkKind::ALL {
            // Metadata is compact JSON, so the kind tag is a fixed substring
            let predicate = format!(
                "generation = '{generation}' AND metadata LIKE '%\"type\":\"{}\"%'",
                kind.as_str()
            );
            let count = table
                .count_rows(Some(predicate))
                .await
                .map_err(|e| UrsaError::Database(format!("Failed to count rows: {e}")))?;
            if count > 0 {
                counts.push((kind, count as u64));
            }
        }

        Ok(counts)
    }

    /// Number of chunks in the current generation
    #[inline]
    pub async fn count_chunks(&self) -> Result<u64> {
        let Some(generation) = self
            .state
            .current_generation()
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to read generation pointer: {e}")))?
        else {
            return Ok(0);
        };

        let table = self.open_table().await?;
        let count = table
            .count_rows(Some(format!("generation = '{generation}'")))
            .await
            .map_err(|e| UrsaError::Database(format!("Failed to count rows: {e}")))?;

        Ok(count as u64)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| UrsaError::Database(format!("Missing {name} column")))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| UrsaError::Database(format!("Invalid {name} column type")))
}
