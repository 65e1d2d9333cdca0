//! Interview Insights — web research on past interviews for a job description.
//!
//! Flow: build search query → web search → concatenate hit contents →
//!       LLM summary in a fixed four-section format.

pub mod handlers;
pub mod prompts;
pub mod search;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::insights::prompts::{INSIGHTS_PROMPT_TEMPLATE, INSIGHTS_QUERY_TEMPLATE, INSIGHTS_SYSTEM};
use crate::insights::search::{SearchHit, WebSearch};
use crate::llm_client::prompts::render;
use crate::llm_client::TextGenerator;

/// Number of search results folded into the prompt.
pub const MAX_SEARCH_RESULTS: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct InsightsResponse {
    pub success: bool,
    pub insights: String,
}

/// Searches the web for interview reports about the JD's role and summarizes them.
pub async fn fetch_interview_insights(
    search: &dyn WebSearch,
    generator: &dyn TextGenerator,
    jd_text: &str,
) -> Result<InsightsResponse, AppError> {
    let query = render(INSIGHTS_QUERY_TEMPLATE, &[("jd_text", jd_text)]);
    let hits = search.search(&query, MAX_SEARCH_RESULTS).await?;
    info!("Interview insights: {} search results", hits.len());

    let combined = combine_hits(&hits);
    let prompt = render(
        INSIGHTS_PROMPT_TEMPLATE,
        &[("jd_text", jd_text), ("search_results", &combined)],
    );
    let insights = generator
        .complete(&prompt, INSIGHTS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Interview insights failed: {e}")))?;

    Ok(InsightsResponse {
        success: true,
        insights,
    })
}

/// Joins non-empty hit contents with blank lines.
fn combine_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|h| h.content.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
