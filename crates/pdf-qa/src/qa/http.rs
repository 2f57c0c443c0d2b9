//! Remote question answering over HTTP with retry logic
//!
//! Talks to a Hugging Face compatible `question-answering` inference endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::types::CandidateAnswer;

use super::service::{AnswerParams, AnswerService};

/// Inference endpoint client with automatic retry
pub struct HttpQaClient {
    /// HTTP client
    client: Client,
    /// Inference URL
    endpoint: String,
    /// Bearer token
    api_token: Option<String>,
    /// Model id, for logging
    model: String,
    /// Maximum retries
    max_retries: u32,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: InferenceInputs<'a>,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Serialize)]
struct InferenceParameters {
    top_k: usize,
    max_answer_len: usize,
    handle_impossible_answer: bool,
}

/// The endpoint returns a bare object when only one answer is produced
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Many(Vec<CandidateAnswer>),
    One(CandidateAnswer),
}

impl InferenceResponse {
    fn into_candidates(self) -> Vec<CandidateAnswer> {
        match self {
            InferenceResponse::Many(candidates) => candidates,
            InferenceResponse::One(candidate) => vec![candidate],
        }
    }
}

impl HttpQaClient {
    /// Create a new client
    pub fn new(config: &QaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Inference request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::model("Unknown error")))
    }

    async fn send(&self, body: &InferenceRequest<'_>) -> Result<Vec<CandidateAnswer>> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::model(format!("Inference endpoint returned {}: {}", status, text)));
        }

        let parsed: InferenceResponse = response.json().await?;
        Ok(parsed.into_candidates())
    }
}

#[async_trait]
impl AnswerService for HttpQaClient {
    async fn answer(
        &self,
        question: &str,
        context: &str,
        params: &AnswerParams,
    ) -> Result<Vec<CandidateAnswer>> {
        let body = InferenceRequest {
            inputs: InferenceInputs { question, context },
            parameters: InferenceParameters {
                top_k: params.top_k,
                max_answer_len: params.max_answer_len,
                handle_impossible_answer: params.handle_impossible_answer,
            },
        };

        let mut candidates = self.retry_request(|| self.send(&body)).await?;
        candidates.truncate(params.top_k);
        Ok(candidates)
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.get(&self.endpoint).send().await {
            Ok(response) => Ok(!response.status().is_server_error()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
