#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

use super::ChatMessage;
use crate::config::OpenAiConfig;
use crate::{Result, UrsaError};

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// Client for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    base_url: Url,
    model: String,
    api_key: Option<String>,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

impl CompletionClient {
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
            model: config.chat_model.clone(),
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

    /// Send a full message list and return the assistant's reply text
    #[inline]
    pub fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!("Requesting completion for {} messages", messages.len());

        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|e| UrsaError::Completion(format!("Failed to build completion URL: {e}")))?;

        let request = CompletionRequest {
            model: &self.model,
            messages,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| UrsaError::Completion(format!("Failed to serialize request: {e}")))?;

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

        let response: CompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| UrsaError::Completion(format!("Failed to parse response: {e}")))?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| UrsaError::Completion("Response contained no choices".to_string()))?;

        debug!("Received completion ({} characters)", reply.len());
        Ok(reply)
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
                                return Err(UrsaError::Completion(format!(
                                    "Completion service returned HTTP {status}"
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
                        return Err(UrsaError::Completion(format!(
                            "Non-retryable error: {error}"
                        )));
                    }

                    last_error = Some(UrsaError::Completion(format!("Request error: {error}")));

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
            .unwrap_or_else(|| UrsaError::Completion("Request failed after retries".to_string())))
    }
}
