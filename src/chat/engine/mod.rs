
use tracing::{debug, info};

use super::{prompt, ChatMessage, CompletionClient};
use crate::config::Config;
use crate::database::lancedb::{KnowledgeStore, RetrievalResult};
use crate::embeddings::EmbeddingClient;
use crate::{Result, UrsaError};

const MAX_QUESTION_LENGTH: usize = 2000;

/// A grounded answer together with the chunks it was grounded on
#[derive(Debug, Clone)]
pub struct EngineAnswer {
    pub text: String,
    pub sources: Vec<RetrievalResult>,
}

/// Retrieval-augmented query engine: embeds the question, searches the
/// knowledge store, and asks the completion service with the retrieved
/// context in the system prompt. Stateless between calls; conversation
/// history arrives with each request.
pub struct RagEngine {
    embeddings: EmbeddingClient,
    completions: CompletionClient,
    store: KnowledgeStore,
    config: Config,
}

impl RagEngine {
    #[inline]
    pub fn new(
        embeddings: EmbeddingClient,
        completions: CompletionClient,
        store: KnowledgeStore,
        config: Config,
    ) -> Self {
        Self {
            embeddings,
            completions,
            store,
            config,
        }
    }

    /// Answer one question. Zero retrieved chunks is a normal outcome and
    /// still produces a reply; any service failure along the way is fatal
    /// for this request only.
    #[inline]
    pub async fn answer(&self, question: &str, history: &[ChatMessage]) -> Result<EngineAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(UrsaError::InvalidRequest(
                "Question cannot be empty".to_string(),
            ));
        }
        if question.len() > MAX_QUESTION_LENGTH {
            return Err(UrsaError::InvalidRequest(format!(
                "Question exceeds {MAX_QUESTION_LENGTH} characters"
            )));
        }

        debug!("Answering question ({} characters)", question.len());

        let query_vector = self.embeddings.embed(question)?;

        let sources = self
            .store
            .search(
                &query_vector,
                self.config.retrieval.similarity_threshold,
                self.config.retrieval.top_k,
            )
            .await?;

        info!("Retrieved {} chunks for question", sources.len());

        let messages = prompt::build_messages(
            &self.config.profile,
            &sources,
            history,
            self.config.retrieval.history_window,
            question,
        );

        let text = self.completions.complete(&messages)?;

        Ok(EngineAnswer { text, sources })
    }

    #[inline]
    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }
}
