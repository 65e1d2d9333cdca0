//! Fit Analyzer — asks the generation service to assess the selected resume chunks against the JD.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::render;
use crate::llm_client::{strip_json_fences, TextGenerator};
use crate::matching::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, CHUNK_SEPARATOR};

/// Typed view of the analysis JSON. Every field is optional because the
/// model output is only loosely constrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitAssessment {
    #[serde(default, deserialize_with = "score_from_any")]
    pub match_score: Option<u32>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default, alias = "Should u apply in this Job?", alias = "should_u_apply")]
    pub should_apply: Option<String>,
}

/// Accepts `87`, `87.0` or `"87"` for the score; anything else is `None`.
fn score_from_any<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    Ok(score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u32))
}

/// Joins ranked chunks into the excerpt block the analysis prompt expects.
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

/// Runs the fit analysis and returns the model's answer, trimmed and without code fences.
pub async fn analyze_fit(
    generator: &dyn TextGenerator,
    resume_chunks: &str,
    jd_summary: &str,
    full_jd: &str,
) -> Result<String, AppError> {
    let prompt = render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("resume_chunks", resume_chunks),
            ("jd_summary", jd_summary),
            ("full_jd", full_jd),
        ],
    );
    let raw = generator
        .complete(&prompt, ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Fit analysis failed: {e}")))?;
    Ok(strip_json_fences(&raw).to_string())
}

/// Parses analysis text as JSON, if it is JSON.
pub fn parse_analysis(analysis: &str) -> Option<serde_json::Value> {
    serde_json::from_str(strip_json_fences(analysis)).ok()
}
