//! Resume analysis — orchestrates one request end to end.
//!
//! Flow: extract resume text → chunk → summarize JD → embed chunks + JD →
//!       rank top-k → analyze fit → respond.
//!
//! Every step runs once. The first collaborator failure aborts the request and
//! is returned to the caller; nothing is retried at this level.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::documents::spool::UploadSpool;
use crate::documents::{load_text, Document, DocumentLoader};
use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::matching::analyzer::{analyze_fit, join_chunks, parse_analysis, FitAssessment};
use crate::matching::chunker::{split_text, ChunkConfig};
use crate::matching::ranker::top_k_similar;
use crate::matching::summarizer::summarize_jd;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Where the job description comes from. Exactly one source per request.
#[derive(Debug, Clone)]
pub enum JobDescriptionSource {
    Document(Document),
    Text(String),
}

impl JobDescriptionSource {
    /// Picks the JD source from the optional upload and optional raw text.
    ///
    /// An uploaded file takes precedence; blank text counts as absent.
    pub fn from_parts(file: Option<Document>, text: Option<String>) -> Result<Self, AppError> {
        if let Some(doc) = file {
            return Ok(JobDescriptionSource::Document(doc));
        }
        match text {
            Some(t) if !t.trim().is_empty() => Ok(JobDescriptionSource::Text(t)),
            _ => Err(AppError::Validation("Provide jd file or jd_text".to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeInput {
    pub resume: Document,
    pub jd: JobDescriptionSource,
    pub top_k: i64,
}

/// Response for `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub jd_summary: String,
    pub selected_chunks_count: usize,
    pub selected_chunks_indices: Vec<usize>,
    /// Raw analyzer output; intended to be JSON but passed through untouched.
    pub analysis: String,
    /// `analysis` parsed as JSON, or null when the model returned something else.
    pub analysis_json: Option<serde_json::Value>,
    /// Typed view of `analysis_json` with lenient field handling.
    pub assessment: Option<FitAssessment>,
}

/// Collaborators and settings one analysis needs. Cheap to clone.
#[derive(Clone)]
pub struct MatchingServices {
    pub loader: Arc<dyn DocumentLoader>,
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn TextGenerator>,
    pub chunking: ChunkConfig,
    pub spool: Option<UploadSpool>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full analysis for one request.
///
/// Steps:
/// 1. extract resume text; extract or accept JD text
/// 2. split_text() → resume chunks
/// 3. summarize_jd() → JD summary
/// 4. embed_documents(chunks) + embed_query(jd)
/// 5. top_k_similar() → selected chunk indices
/// 6. analyze_fit() on the selected chunks
/// 7. assemble AnalysisResponse
pub async fn run_analysis(
    services: &MatchingServices,
    input: AnalyzeInput,
) -> Result<AnalysisResponse, AppError> {
    // Step 1: Document text
    let resume_text = extract_text(services, input.resume).await?;
    let full_jd = match input.jd {
        JobDescriptionSource::Document(doc) => extract_text(services, doc).await?,
        JobDescriptionSource::Text(text) => text,
    };
    if full_jd.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Job description contains no extractable text".to_string(),
        ));
    }

    // Step 2: Chunk
    let chunks = split_text(&resume_text, &services.chunking);
    if chunks.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Resume contains no extractable text".to_string(),
        ));
    }
    info!(
        "Resume split into {} chunks (size={}, overlap={})",
        chunks.len(),
        services.chunking.size(),
        services.chunking.overlap()
    );

    // Step 3: JD summary
    let jd_summary = summarize_jd(services.generator.as_ref(), &full_jd).await?;

    // Step 4: Embeddings
    let chunk_embeddings = services.embedder.embed_documents(&chunks).await?;
    if chunk_embeddings.len() != chunks.len() {
        return Err(AppError::Embedding(format!(
            "expected {} chunk embeddings, got {}",
            chunks.len(),
            chunk_embeddings.len()
        )));
    }
    let jd_embedding = services.embedder.embed_query(&full_jd).await?;

    // Step 5: Rank
    let selected_indices = top_k_similar(&jd_embedding, &chunk_embeddings, input.top_k)?;
    info!("Selected resume chunks {:?} (top_k={})", selected_indices, input.top_k);

    let selected: Vec<&str> = selected_indices
        .iter()
        .map(|&i| chunks[i].as_str())
        .collect();

    // Step 6: Fit analysis
    let analysis = analyze_fit(
        services.generator.as_ref(),
        &join_chunks(&selected),
        &jd_summary,
        &full_jd,
    )
    .await?;

    let analysis_json = parse_analysis(&analysis);
    let assessment = analysis_json
        .clone()
        .and_then(|v| serde_json::from_value::<FitAssessment>(v).ok());
    if let Some(score) = assessment.as_ref().and_then(|a| a.match_score) {
        info!("Fit analysis complete: match_score={score}");
    } else {
        debug!("Fit analysis returned no parseable match_score");
    }

    // Step 7: Respond
    Ok(AnalysisResponse {
        jd_summary,
        selected_chunks_count: selected_indices.len(),
        selected_chunks_indices: selected_indices,
        analysis,
        analysis_json,
        assessment,
    })
}

/// Spools the upload if configured, then extracts its text off the async runtime.
async fn extract_text(services: &MatchingServices, document: Document) -> Result<String, AppError> {
    if let Some(spool) = &services.spool {
        spool.save(&document).await?;
    }

    let loader = Arc::clone(&services.loader);
    let text = tokio::task::spawn_blocking(move || load_text(loader.as_ref(), &document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;
    debug!("Extracted {} characters", text.chars().count());
    Ok(text)
}
