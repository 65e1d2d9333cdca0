use std::sync::Arc;

use crate::insights::search::WebSearch;
use crate::matching::pipeline::MatchingServices;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once in `main`; every collaborator is an explicitly constructed handle
/// reused across requests. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub matching: MatchingServices,
    /// Web search for interview insights. `None` when no search key is configured.
    pub search: Option<Arc<dyn WebSearch>>,
    pub default_top_k: i64,
    pub max_upload_bytes: usize,
}
