//! Prompt Orchestrator — builds prompts, calls the model, validates replies.
//!
//! Every reply is parsed into a `ModelReply`: either a payload that passed
//! the schema and its semantic checks, or the reason it did not. An invalid
//! reply is rejected wholesale as `ResponseMalformed`; nothing is salvaged.
//! The orchestrator never touches persistence.

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_json_fences, LanguageModel, LlmError};
use crate::models::context::ContextItem;
use crate::models::job::{JobInsights, JobPosting};
use crate::models::resume::{ResumeDocument, Section, SectionKind, StructuredEntry};
use crate::models::tailoring::{ChangeEntry, FocusSet, TailoringResult};
use crate::resume::contact::extract_contact_info;
use crate::resume::parser::assemble_section;
use crate::tailoring::keywords;
use crate::tailoring::prompts::{
    EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM, INSIGHTS_PROMPT_TEMPLATE, TAILOR_PROMPT_TEMPLATE,
    TAILOR_SYSTEM,
};

// ────────────────────────────────────────────────────────────────────────────
// Reply validation
// ────────────────────────────────────────────────────────────────────────────

/// A model reply checked against its schema.
#[derive(Debug)]
pub enum ModelReply<T> {
    Valid(T),
    Invalid { reason: String },
}

impl<T> ModelReply<T> {
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            ModelReply::Valid(payload) => Ok(payload),
            ModelReply::Invalid { reason } => Err(AppError::ResponseMalformed(reason)),
        }
    }
}

/// A reply payload: its serde shape plus the checks serde cannot express.
trait ReplySchema: DeserializeOwned {
    fn check(&self) -> Result<(), String>;
}

fn parse_reply<T: ReplySchema>(raw: &str) -> ModelReply<T> {
    let body = strip_json_fences(raw);
    match serde_json::from_str::<T>(body) {
        Ok(payload) => match payload.check() {
            Ok(()) => ModelReply::Valid(payload),
            Err(reason) => ModelReply::Invalid { reason },
        },
        Err(e) => ModelReply::Invalid {
            reason: format!("reply does not match the schema: {e}"),
        },
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TailorReply {
    optimized_resume_text: String,
    change_list: Vec<ChangeEntry>,
    keywords: Vec<String>,
    suggestions: Vec<String>,
    confidence_score: f64,
}

impl ReplySchema for TailorReply {
    fn check(&self) -> Result<(), String> {
        if self.optimized_resume_text.trim().is_empty() {
            return Err("optimized_resume_text is empty".into());
        }
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(format!(
                "confidence_score {} is outside [0, 1]",
                self.confidence_score
            ));
        }
        for (i, change) in self.change_list.iter().enumerate() {
            if change.section.trim().is_empty()
                || change.new_excerpt.trim().is_empty()
                || change.rationale.trim().is_empty()
            {
                return Err(format!("change_list[{i}] has an empty required field"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructureReply {
    sections: Vec<SectionReply>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionReply {
    kind: SectionKind,
    heading: Option<String>,
    lines: Vec<String>,
}

impl ReplySchema for StructureReply {
    fn check(&self) -> Result<(), String> {
        if self.sections.is_empty() {
            return Err("no sections returned".into());
        }
        Ok(())
    }
}

impl ReplySchema for JobInsights {
    fn check(&self) -> Result<(), String> {
        if self.experience_level.trim().is_empty() || self.industry.trim().is_empty() {
            return Err("experience_level and industry are required".into());
        }
        Ok(())
    }
}

/// Transport/auth failures are retryable, unreadable output is not.
fn model_error(err: LlmError) -> AppError {
    match err {
        LlmError::RateLimited { retry_after } => AppError::RateLimited { retry_after },
        LlmError::Http(e) => AppError::ModelUnavailable(e.to_string()),
        LlmError::Api { status, message } => {
            AppError::ModelUnavailable(format!("status {status}: {message}"))
        }
        LlmError::Parse(e) => AppError::ResponseMalformed(e.to_string()),
        LlmError::EmptyContent => AppError::ResponseMalformed("empty reply".into()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PromptOrchestrator {
    model: Arc<dyn LanguageModel>,
}

impl PromptOrchestrator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    async fn ask<T: ReplySchema>(&self, prompt: &str, system: &str) -> Result<T, AppError> {
        let raw = self
            .model
            .complete(prompt, system)
            .await
            .map_err(model_error)?;
        let reply = parse_reply::<T>(&raw);
        if let ModelReply::Invalid { reason } = &reply {
            warn!("Rejecting model reply: {reason}");
        }
        reply.into_result()
    }

    /// Lets the model segment text the heuristics could not. Lines are kept
    /// verbatim; any source line the model skipped lands in a trailing
    /// `Other` section, and a line that is not in the source rejects the reply.
    pub async fn extract_structure(&self, raw_text: &str) -> Result<ResumeDocument, AppError> {
        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", raw_text);
        let reply: StructureReply = self.ask(&prompt, EXTRACT_SYSTEM).await?;

        let source_lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let source_set: HashSet<&str> = source_lines.iter().copied().collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut sections: Vec<Section> = Vec::new();
        for section in &reply.sections {
            for line in section.lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                if !source_set.contains(line) {
                    return Err(AppError::ResponseMalformed(format!(
                        "section line not present in the resume: {line:?}"
                    )));
                }
                seen.insert(line);
            }
            if let Some(heading) = section.heading.as_deref().map(str::trim) {
                if !heading.is_empty() && !source_set.contains(heading) {
                    return Err(AppError::ResponseMalformed(format!(
                        "heading not present in the resume: {heading:?}"
                    )));
                }
                seen.insert(heading);
            }

            let lines: Vec<&str> = section.lines.iter().map(String::as_str).collect();
            sections.extend(assemble_section(
                section.kind,
                section.heading.as_deref(),
                &lines,
            ));
        }

        let missing: Vec<&str> = source_lines
            .iter()
            .copied()
            .filter(|l| !seen.contains(l))
            .collect();
        if !missing.is_empty() {
            warn!("Model skipped {} resume lines; keeping them under Other", missing.len());
            sections.extend(assemble_section(SectionKind::Other, None, &missing));
        }

        debug!("Model structured resume into {} sections", sections.len());
        Ok(ResumeDocument {
            contact: extract_contact_info(raw_text),
            sections,
        })
    }

    /// Tailors `resume` for `job`. Keyword coverage is computed here, from the
    /// posting's vocabulary keywords plus the ones the model reported, checked
    /// against the original resume and the supplied context.
    pub async fn tailor(
        &self,
        resume: &ResumeDocument,
        context: &[ContextItem],
        job: &JobPosting,
        focus: &FocusSet,
    ) -> Result<TailoringResult, AppError> {
        let detected = keywords::extract_keywords(&job.description);
        let prompt = build_tailor_prompt(resume, context, job, focus, &detected);

        info!(
            "Tailoring for '{}' at '{}' (focus: {}, {} context items)",
            job.job_title,
            job.company,
            focus.label(),
            context.len()
        );
        let reply: TailorReply = self.ask(&prompt, TAILOR_SYSTEM).await?;

        let resume_text = resume.full_text();
        let mut sources: Vec<&str> = vec![resume_text.as_str()];
        sources.extend(context.iter().map(|item| item.content.as_str()));
        let keyword_coverage = keywords::coverage(
            detected.iter().chain(reply.keywords.iter()),
            &sources,
        );

        Ok(TailoringResult {
            optimized_resume_text: reply.optimized_resume_text,
            change_list: reply.change_list,
            keyword_coverage,
            suggestions: reply
                .suggestions
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            confidence_score: reply.confidence_score,
        })
    }

    pub async fn job_insights(&self, job: &JobPosting) -> Result<JobInsights, AppError> {
        let prompt = INSIGHTS_PROMPT_TEMPLATE
            .replace("{job_title}", &job.job_title)
            .replace("{company}", &job.company)
            .replace("{description}", &job.description);
        self.ask(&prompt, JSON_ONLY_SYSTEM).await
    }
}

fn build_tailor_prompt(
    resume: &ResumeDocument,
    context: &[ContextItem],
    job: &JobPosting,
    focus: &FocusSet,
    detected: &[String],
) -> String {
    let keywords = if detected.is_empty() {
        "(none detected)".to_string()
    } else {
        detected.join(", ")
    };

    // job text goes in last so placeholders inside it are left alone
    TAILOR_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{keywords}", &keywords)
        .replace("{focus}", &focus.label())
        .replace("{resume_sections}", &render_sections(resume))
        .replace("{context_items}", &render_context(context))
        .replace("{job_title}", &job.job_title)
        .replace("{company}", &job.company)
        .replace("{description}", &job.description)
}

fn render_sections(resume: &ResumeDocument) -> String {
    resume
        .sections
        .iter()
        .map(|section| {
            let mut block = format!(
                "[{}]\n{}",
                section.kind.as_str().to_uppercase(),
                section.raw_text
            );
            for project in section.structured_entries.iter().filter_map(|e| match e {
                StructuredEntry::Project(p) if !p.technologies.is_empty() => Some(p),
                _ => None,
            }) {
                block.push_str(&format!(
                    "\n(project \"{}\" uses: {})",
                    project.name,
                    project.technologies.join(", ")
                ));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_context(context: &[ContextItem]) -> String {
    if context.is_empty() {
        return "(none provided)".to_string();
    }
    context
        .iter()
        .map(|item| format!("- ({}) {}", item.category, item.content))
        .collect::<Vec<_>>()
        .join("\n")
}
