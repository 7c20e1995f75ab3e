
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::database::lancedb::{EmbeddingRecord, KnowledgeStore};
use crate::database::sqlite::Database;
use crate::embeddings::EmbeddingClient;
use crate::knowledge::aggregate;
use crate::{Result, UrsaError};

/// Outcome of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Full rebuild of the knowledge base: aggregate every source record into
/// chunks, embed them one at a time, then atomically replace the stored
/// generation.
///
/// Aggregation failures abort the run before anything is written. Embedding
/// failures are tolerated per chunk; the failed chunk is skipped and counted.
/// A run where every chunk fails publishes nothing.
pub struct IngestPipeline {
    embeddings: EmbeddingClient,
    store: KnowledgeStore,
    database: Database,
    config: Config,
}

impl IngestPipeline {
    #[inline]
    pub fn new(
        embeddings: EmbeddingClient,
        store: KnowledgeStore,
        database: Database,
        config: Config,
    ) -> Self {
        Self {
            embeddings,
            store,
            database,
            config,
        }
    }

    #[inline]
    pub async fn run(&self, show_progress: bool) -> Result<IngestReport> {
        info!("Starting knowledge base ingestion");

        let chunks = aggregate(self.database.pool(), &self.config.profile).await?;
        let processed = chunks.len();
        info!("Aggregated {} knowledge chunks", processed);

        let progress = if show_progress {
            let bar = ProgressBar::new(processed as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };

        let delay = Duration::from_millis(self.config.retrieval.ingest_delay_ms);
        let mut records = Vec::with_capacity(processed);
        let mut failed = 0_usize;

        for (i, chunk) in chunks.into_iter().enumerate() {
            if let Some(bar) = &progress {
                if let Some(title) = &chunk.metadata.title {
                    bar.set_message(title.clone());
                }
            }

            match self.embeddings.embed(&chunk.content) {
                Ok(vector) => {
                    records.push(EmbeddingRecord {
                        id: Uuid::new_v4().to_string(),
                        vector,
                        content: chunk.content,
                        metadata: chunk.metadata,
                        created_at: Utc::now().to_rfc3339(),
                    });
                }
                Err(error) => {
                    warn!(
                        "Skipping chunk {} ({}): {}",
                        i + 1,
                        chunk.metadata.kind,
                        error
                    );
                    failed += 1;
                }
            }

            if let Some(bar) = &progress {
                bar.inc(1);
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }

        let succeeded = records.len();

        if processed > 0 && succeeded == 0 {
            return Err(UrsaError::Embedding(format!(
                "All {processed} chunks failed to embed; keeping the previous knowledge base"
            )));
        }

        let generation = self.store.replace_all(records).await?;

        info!(
            "Ingestion complete: {}/{} chunks stored ({} failed), generation {}",
            succeeded, processed, failed, generation
        );

        Ok(IngestReport {
            processed,
            succeeded,
            failed,
        })
    }
}
