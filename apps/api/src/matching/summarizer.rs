//! JD Summarizer — asks the generation service for a structured job description summary.

use crate::errors::AppError;
use crate::llm_client::prompts::render;
use crate::llm_client::{strip_json_fences, TextGenerator};
use crate::matching::prompts::{JD_SUMMARY_PROMPT_TEMPLATE, JD_SUMMARY_SYSTEM};

/// Returns the model's summary text, trimmed and without code fences.
///
/// The summary is passed through as opaque text; it is usually JSON but is
/// never required to parse.
pub async fn summarize_jd(generator: &dyn TextGenerator, jd_text: &str) -> Result<String, AppError> {
    let prompt = render(JD_SUMMARY_PROMPT_TEMPLATE, &[("jd_text", jd_text)]);
    let raw = generator
        .complete(&prompt, JD_SUMMARY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("JD summary failed: {e}")))?;
    Ok(strip_json_fences(&raw).to_string())
}
