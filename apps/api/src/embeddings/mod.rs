//! Embeddings — maps text to fixed-dimension vectors through an OpenAI-compatible API.
//!
//! `AppState` holds an `Arc<dyn Embedder>`; the ranker only ever sees the vectors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{backoff_delay, provider_error_message};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding {index} has dimension {actual}, expected {expected}")]
    RaggedDimensions {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("embedding service returned no vector")]
    Empty,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_attempts: u32,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_attempts: max_attempts.max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, texts: &[String]) -> Result<EmbeddingResponse, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, text);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: provider_error_message(text),
                });
                continue;
            }
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: provider_error_message(text),
                });
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(EmbeddingError::Empty))
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.request(texts).await?;
        let vectors = order_embeddings(response.data, texts.len())?;
        debug!(
            "Embedded {} texts (dim={})",
            vectors.len(),
            vectors.first().map(Vec::len).unwrap_or(0)
        );
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = [text.to_string()];
        let response = self.request(&input).await?;
        order_embeddings(response.data, 1)?
            .pop()
            .ok_or(EmbeddingError::Empty)
    }
}

/// Re-orders response items by their `index` and checks count and dimensionality.
fn order_embeddings(
    mut items: Vec<EmbeddingItem>,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if items.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: items.len(),
        });
    }

    // items without an index keep their response position
    items
        .iter_mut()
        .enumerate()
        .for_each(|(pos, item)| {
            item.index.get_or_insert(pos);
        });
    items.sort_by_key(|item| item.index);

    let dim = items.first().map(|i| i.embedding.len()).unwrap_or(0);
    if dim == 0 && expected > 0 {
        return Err(EmbeddingError::Empty);
    }
    for (index, item) in items.iter().enumerate() {
        if item.embedding.len() != dim {
            return Err(EmbeddingError::RaggedDimensions {
                index,
                expected: dim,
                actual: item.embedding.len(),
            });
        }
    }

    Ok(items.into_iter().map(|i| i.embedding).collect())
}
