//! CV analysis prompt

/// Build the prompt that asks the model to match a CV against a job posting.
///
/// The requested JSON shape matches what the web client renders: a score,
/// a summary, strengths, gaps, per-skill status, experience match and
/// recommendations.
pub fn build_analysis_prompt(cv_text: &str, job_text: &str) -> String {
    format!(
        r#"You are an experienced technical recruiter. Compare the candidate CV with the job announcement below.

Respond with a single JSON object and nothing else, using exactly these fields:
{{
  "score": <integer 0-100, overall fit>,
  "summary": "<two or three sentences>",
  "strengths": ["<strength>", ...],
  "gaps": ["<missing requirement>", ...],
  "skills": [{{"name": "<skill from the job announcement>", "status": "strong" | "partial" | "missing"}}, ...],
  "experience": [{{"category": "<area>", "match": <integer 0-100>}}, ...],
  "recommendations": ["<concrete advice for the candidate>", ...]
}}

The CV or the announcement may be written in English or Macedonian; answer in the language of the job announcement.

=== JOB ANNOUNCEMENT ===
{job}

=== CANDIDATE CV ===
{cv}
"#,
        job = job_text.trim(),
        cv = cv_text.trim(),
    )
}
