// All LLM prompt constants for the tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for tailoring — enforces JSON-only output.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer and ATS specialist. \
    You tailor an existing resume to a specific job posting using only verified facts. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent facts that are not in the resume or the additional context.";

/// Tailoring prompt template.
/// Replace: {grounding_instruction}, {job_title}, {company}, {description},
///          {keywords}, {focus}, {resume_sections}, {context_items}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Tailor the resume below for this position.

JOB TITLE: {job_title}
COMPANY: {company}

JOB DESCRIPTION:
{description}

KEYWORDS DETECTED IN THE POSTING: {keywords}

FOCUS AREAS (emphasize these): {focus}

CURRENT RESUME (sections in original order):
{resume_sections}

ADDITIONAL CONTEXT FROM THE CANDIDATE (verified facts, may be added to the resume):
{context_items}

Return a JSON object with this EXACT schema (no extra fields):
{
  "optimized_resume_text": "the full tailored resume as plain text",
  "change_list": [
    {
      "section": "Experience",
      "original_excerpt": "text as it was, or an empty string for an addition",
      "new_excerpt": "text as it is now",
      "rationale": "why this change helps for this posting"
    }
  ],
  "keywords": ["every important skill or keyword the posting asks for"],
  "suggestions": ["advice the candidate could act on outside this rewrite"],
  "confidence_score": 0.0
}

Rules:
- Keep the section order of the current resume.
- Rephrase bullets to mirror the posting's language only where the facts allow it.
- When the additional context holds experience the posting asks for and the resume lacks it, ADD it and list it in change_list with an empty original_excerpt.
- Every change_list entry needs a non-empty section, new_excerpt and rationale.
- confidence_score is your confidence (0.0 to 1.0) that the tailored resume matches the posting."#;

/// System prompt for structure extraction.
pub const EXTRACT_SYSTEM: &str = "You are a precise resume parser. \
    You split resume text into sections without rewriting a single line. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Structure extraction prompt template. Replace `{resume_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Split the following resume text into sections.

Return a JSON object with this EXACT schema (no extra fields):
{
  "sections": [
    {
      "kind": "summary | experience | education | skills | other",
      "heading": "the heading line as written, or null",
      "lines": ["every line of the section, copied verbatim, in order"]
    }
  ]
}

Rules:
- Copy lines exactly; never merge, split, or reword them.
- Every non-empty input line must appear in exactly one section.
- Use "other" for anything that is not a summary, experience, education or skills section.

RESUME TEXT:
{resume_text}"#;

/// Job insights prompt template.
/// Replace: {job_title}, {company}, {description}
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"Analyze this job posting.

JOB TITLE: {job_title}
COMPANY: {company}

JOB DESCRIPTION:
{description}

Return a JSON object with this EXACT schema (no extra fields):
{
  "key_skills": ["most important skills, most important first"],
  "experience_level": "entry | mid | senior | lead | executive",
  "industry": "the industry the company operates in",
  "salary_range": "the stated or typical range, or null if unknown",
  "growth_opportunities": ["career growth signals in the posting"],
  "culture_indicators": ["signals about team and company culture"]
}"#;
