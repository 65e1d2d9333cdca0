//! Web search collaborator used by interview insights. Tavily by default.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::provider_error_message;

pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl TavilyClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, TAVILY_SEARCH_URL.to_string(), timeout)
    }

    pub fn with_endpoint(
        api_key: String,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint,
        })
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TavilyRequest {
                api_key: &self.api_key,
                query,
                max_results,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: provider_error_message(body),
            });
        }

        let parsed: TavilyResponse = response.json().await?;
        debug!("Web search returned {} results", parsed.results.len());
        Ok(parsed.results)
    }
}
