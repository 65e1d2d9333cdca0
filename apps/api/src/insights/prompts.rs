// Interview insights prompt templates.

pub const INSIGHTS_SYSTEM: &str = "\
You are an interview research assistant. \
You summarize interview information found online for a given job description. \
Only report what the provided search results support. \
If a section has no supporting information, write \"Not found\" for it.";

/// Replace `{jd_text}` and `{search_results}` before sending.
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"From the job description below, identify:
- Company name
- Role / position title
- Tech stack or domain (if mentioned)

Then, using ONLY the online data provided, produce a detailed, structured report in
EXACTLY this format:

1. Past Interview Questions (Last 1 year) - list of questions asked (minimum 10 if available).
2. Past Interview Experiences (Last 1 year) - list of interview experiences (minimum 5 if available).
3. Typical Number of Rounds (Last 1 year) - number of interview rounds generally conducted for this position.
4. Insider Tips (Last 1 year) - list of tips for the interview process.

If you are not able to find information for a section, write "Not found".

Job Description:
{jd_text}

Online data found:
{search_results}"#;

/// Search query sent to the web search collaborator. Replace `{jd_text}`.
pub const INSIGHTS_QUERY_TEMPLATE: &str =
    "Interview questions and experiences last 1 year for this job description: {jd_text}";
