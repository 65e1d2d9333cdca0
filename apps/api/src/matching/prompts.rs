// All LLM prompt constants for the matching module.
// Placeholders are filled with `llm_client::prompts::render`.

/// System prompt for JD summarization.
pub const JD_SUMMARY_SYSTEM: &str = "You are an expert job description analyst. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// JD summary prompt. Replace `{jd_text}` before sending.
pub const JD_SUMMARY_PROMPT_TEMPLATE: &str = r#"Extract a summary from this job description with these fields:
company name, job title, location, requirements, education required,
experience required, skills required, package offering.

If any of the information is not provided in the job description, use "not mentioned" as its value.

Return ONLY a JSON object with this shape:
{
  "company_name": "string",
  "job_title": "string",
  "location": "string",
  "requirements": ["string"],
  "education_required": "string",
  "experience_required": "string",
  "skills_required": ["string"],
  "package_offering": "string"
}

Job Description:
{jd_text}"#;

/// System prompt for the fit analysis.
pub const ANALYSIS_SYSTEM: &str = "You are an expert resume evaluator. \
    Judge the candidate only on the resume excerpts you are given. \
    Do NOT invent experience that is not in the excerpts. \
    You MUST respond with valid JSON only — no markdown fences, no explanations.";

/// Fit analysis prompt. Replace `{resume_chunks}`, `{jd_summary}` and `{full_jd}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Inputs:
- Resume Chunks (the excerpts most relevant to the job)
- JD Summary (JSON)
- Full Job Description (text)

Produce ONLY this JSON:

{
  "match_score": <0-100 integer>,
  "missing_skills": ["string"],
  "strengths": ["string"],
  "should_apply": "<short 1-2 sentence fit response>"
}

Resume Chunks:
{resume_chunks}

JD Summary:
{jd_summary}

Full JD:
{full_jd}"#;

/// Separator placed between selected resume chunks in the analysis prompt.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";
