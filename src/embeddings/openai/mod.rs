
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::OpenAiConfig;
use crate::{Result, UrsaError};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// Client for an OpenAI-compatible embeddings endpoint. One request per
/// text; the same dimension is enforced for ingestion and query vectors.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    base_url: Url,
    model: String,
    dimension: usize,
    api_key: Option<String>,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    #[inline]
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let base_url = config
            .api_base_url()
            .map_err(|e| UrsaError::Config(e.to_string()))?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension as usize,
            api_key: config.api_key(),
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        self
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Check that the embedding service is reachable
    #[inline]
    pub fn ping(&self) -> Result<()> {
        let url = self
            .base_url
            .join("models")
            .map_err(|e| UrsaError::Embedding(format!("Failed to build ping URL: {e}")))?;

        debug!("Pinging embedding service at {}", url);

        self.make_request_with_retry(|| {
            let mut request = self.agent.get(url.as_str());
            if let Some(key) = &self.api_key {
                request = request.header("Authorization", format!("Bearer {key}").as_str());
            }
            request
                .call()
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        debug!("Embedding service ping successful");
        Ok(())
    }

    /// Generate an embedding for a single text. The response vector must
    /// match the configured dimension or the call fails.
    #[inline]
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating embedding for text (length: {})", text.len());

        let request = EmbedRequest {
            model: self.model.clone(),
            input: text.to_string(),
        };

        let url = self
            .base_url
            .join("embeddings")
            .map_err(|e| UrsaError::Embedding(format!("Failed to build embedding URL: {e}")))?;

        let request_json = serde_json::to_string(&request)
            .map_err(|e| UrsaError::Embedding(format!("Failed to serialize request: {e}")))?;

        let response_text = self.make_request_with_retry(|| {
            let mut request = self
                .agent
                .post(url.as_str())
                .header("Content-Type", "application/json");
            if let Some(key) = &self.api_key {
                request = request.header("Authorization", format!("Bearer {key}").as_str());
            }
            request
                .send(&request_json)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        let response: EmbedResponse = serde_json::from_str(&response_text)
            .map_err(|e| UrsaError::Embedding(format!("Failed to parse response: {e}")))?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| UrsaError::Embedding("Response contained no embedding".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(UrsaError::Embedding(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.dimension,
                embedding.len()
            )));
        }

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }

    fn make_request_with_retry<F>(&self, mut request_fn: F) -> Result<String>
    where
        F: FnMut() -> std::result::Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!("HTTP request attempt {}/{}", attempt, self.retry_attempts);

            match request_fn() {
                Ok(response_text) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(response_text);
                }
                Err(error) => {
                    let should_retry = match &error {
                        ureq::Error::StatusCode(status) => {
                            if *status >= 500 {
                                warn!(
                                    "Server error (status {}), attempt {}/{}",
                                    status, attempt, self.retry_attempts
                                );
                                true
                            } else {
                                warn!("Client error (status {}), not retrying", status);
                                return Err(UrsaError::Embedding(format!(
                                    "Embedding service returned HTTP {status}"
                                )));
                            }
                        }
                        ureq::Error::ConnectionFailed
                        | ureq::Error::HostNotFound
                        | ureq::Error::Timeout(_)
                        | ureq::Error::Io(_) => {
                            warn!(
                                "Transport error: {}, attempt {}/{}",
                                error, attempt, self.retry_attempts
                            );
                            true
                        }
                        _ => {
                            warn!("Non-retryable error: {}", error);
                            false
                        }
                    };

                    if !should_retry {
                        return Err(UrsaError::Embedding(format!(
                            "Non-retryable error: {error}"
                        )));
                    }

                    last_error = Some(UrsaError::Embedding(format!("Request error: {error}")));

                    if attempt < self.retry_attempts {
                        let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                        let delay = Duration::from_millis(delay_ms);
                        debug!("Waiting {:?} before retry", delay);
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        error!("All retry attempts failed for request to {}", self.base_url);

        Err(last_error
            .unwrap_or_else(|| UrsaError::Embedding("Request failed after retries".to_string())))
    }
}
