// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file only holds the cross-cutting pieces.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that rewrites candidate material.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim in your output must be traceable to the resume or to the \
    additional context provided. Do NOT invent employers, titles, dates, metrics or \
    skills. If nothing supports a change, leave the original text as it is.";
