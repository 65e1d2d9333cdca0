//! In-process fakes for the external collaborators, shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;

use crate::documents::{DocumentLoader, ExtractionError};
use crate::embeddings::{Embedder, EmbeddingError};
use crate::insights::search::{SearchError, SearchHit, WebSearch};
use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::chunker::{ChunkConfig, ChunkUnit};
use crate::matching::pipeline::MatchingServices;
use crate::state::AppState;

/// Replies with queued responses in order and records every prompt it saw.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose first call fails with a 500 from the provider.
    pub fn failing() -> Self {
        Self::new(vec![Err(LlmError::Api {
            status: 500,
            message: "model overloaded".to_string(),
        })])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Embeds text by counting keyword occurrences, one dimension per keyword.
pub struct KeywordEmbedder {
    keywords: Vec<String>,
    fail: bool,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            keywords: Vec::new(),
            fail: true,
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|k| lower.matches(k.as_str()).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::Api {
                status: 503,
                message: "embedding backend down".to_string(),
            });
        }
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::Api {
                status: 503,
                message: "embedding backend down".to_string(),
            });
        }
        Ok(self.vector(text))
    }
}

/// Treats the uploaded bytes as UTF-8 pages separated by form feeds.
pub struct Utf8PageLoader;

impl DocumentLoader for Utf8PageLoader {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        Ok(String::from_utf8_lossy(bytes)
            .split('\u{c}')
            .map(str::to_string)
            .collect())
    }
}

/// Returns canned hits and records the queries it received.
#[derive(Default)]
pub struct CannedSearch {
    hits: Vec<SearchHit>,
    queries: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl CannedSearch {
    pub fn new(contents: &[&str]) -> Self {
        Self {
            hits: contents
                .iter()
                .enumerate()
                .map(|(i, c)| SearchHit {
                    title: format!("result {i}"),
                    url: format!("https://example.com/{i}"),
                    content: c.to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for CannedSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Api {
                status: 401,
                message: "invalid api key".to_string(),
            });
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// One part of a hand-built multipart body.
pub struct Part {
    name: String,
    file: Option<(String, String)>,
    body: String,
}

impl Part {
    pub fn file(name: &str, file_name: &str, content_type: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            file: Some((file_name.to_string(), content_type.to_string())),
            body: body.to_string(),
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file: None,
            body: value.to_string(),
        }
    }
}

const BOUNDARY: &str = "resume-fit-test-boundary";

/// Builds a `POST` request carrying `parts` as `multipart/form-data`.
pub fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match &part.file {
            Some((file_name, content_type)) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, file_name
                ));
                body.push_str(&format!("Content-Type: {content_type}\r\n"));
            }
            None => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n",
                    part.name
                ));
            }
        }
        body.push_str("\r\n");
        body.push_str(&part.body);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn response_json(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// App state wired to in-process fakes. Chunks are four words with no overlap
/// so short fixtures still split into several chunks.
pub fn test_state(generator: ScriptedGenerator, embedder: KeywordEmbedder) -> AppState {
    AppState {
        matching: MatchingServices {
            loader: Arc::new(Utf8PageLoader),
            embedder: Arc::new(embedder),
            generator: Arc::new(generator),
            chunking: ChunkConfig::new(4, 0, ChunkUnit::Word).unwrap(),
            spool: None,
        },
        search: None,
        default_top_k: 5,
        max_upload_bytes: 10 * 1024 * 1024,
    }
}
