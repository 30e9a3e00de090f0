//! Tailoring Pipeline — the façade the HTTP shim calls.
//!
//! Flow: validate input → cache lookup (hit: done, no model call) →
//!       parse resume → focus-filtered context → model (under timeout) →
//!       upsert result → return.
//!
//! Nothing is written unless the model produced a valid result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::OptimizationCache;
use crate::config::PipelineConfig;
use crate::context::ContextStore;
use crate::db::Database;
use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::models::context::ContextItem;
use crate::models::job::{JobInsights, JobPosting};
use crate::models::resume::ResumeDocument;
use crate::models::tailoring::{FocusSet, TailoringResult};
use crate::resume::{DocumentFormat, ResumeParser, MAX_DOCUMENT_BYTES};
use crate::tailoring::orchestrator::PromptOrchestrator;

#[derive(Debug, Clone)]
pub struct TailorRequest {
    pub resume_bytes: Bytes,
    /// Extension, file name or MIME type of the upload.
    pub format: String,
    pub job: JobPosting,
    pub focus: FocusSet,
    /// Caller deadline for the model work; the configured default otherwise.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TailoringOutcome {
    pub job_id: i64,
    pub from_cache: bool,
    pub result: TailoringResult,
}

pub struct TailoringPipeline {
    parser: ResumeParser,
    context: ContextStore,
    cache: OptimizationCache,
    orchestrator: PromptOrchestrator,
    config: PipelineConfig,
}

impl TailoringPipeline {
    pub fn new(db: Database, model: Arc<dyn LanguageModel>, config: PipelineConfig) -> Self {
        Self::with_parser(db, model, config, ResumeParser::default())
    }

    pub fn with_parser(
        db: Database,
        model: Arc<dyn LanguageModel>,
        config: PipelineConfig,
        parser: ResumeParser,
    ) -> Self {
        Self {
            parser,
            context: ContextStore::new(db.clone()),
            cache: OptimizationCache::new(db),
            orchestrator: PromptOrchestrator::new(model),
            config,
        }
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    pub fn cache(&self) -> &OptimizationCache {
        &self.cache
    }

    pub async fn tailor_resume(&self, req: TailorRequest) -> Result<TailoringOutcome, AppError> {
        req.job.validate()?;
        let format = check_upload(&req.resume_bytes, &req.format)?;
        let job = &req.job;

        if let Some(record) = self
            .cache
            .lookup(&job.job_title, &job.company, &job.description)
            .await?
        {
            if let Some(result) = record.optimized_resume {
                info!("Serving cached tailoring for job {}", record.id);
                return Ok(TailoringOutcome {
                    job_id: record.id,
                    from_cache: true,
                    result,
                });
            }
        }

        let document = self.parse_resume(req.resume_bytes.clone(), format).await?;
        let context = focus_context(self.context.list(None).await?, &req.focus);

        let limit = req.timeout.unwrap_or(self.config.model_timeout);
        let result = with_timeout(limit, async {
            let document = if self.config.structure_fallback && document.is_unstructured() {
                info!("No headings recognized, asking the model to structure the resume");
                self.orchestrator
                    .extract_structure(&document.full_text())
                    .await?
            } else {
                document
            };
            self.orchestrator
                .tailor(&document, &context, job, &req.focus)
                .await
        })
        .await?;

        let record = self
            .cache
            .store(&job.job_title, &job.company, &job.description, &result)
            .await?;

        Ok(TailoringOutcome {
            job_id: record.id,
            from_cache: false,
            result,
        })
    }

    /// Parses an upload without tailoring it (used for the resume check).
    pub async fn inspect_resume(&self, bytes: Bytes, label: &str) -> Result<ResumeDocument, AppError> {
        let format = check_upload(&bytes, label)?;
        self.parse_resume(bytes, format).await
    }

    pub async fn job_insights(
        &self,
        job: &JobPosting,
        timeout: Option<Duration>,
    ) -> Result<JobInsights, AppError> {
        job.validate()?;
        let limit = timeout.unwrap_or(self.config.model_timeout);
        with_timeout(limit, self.orchestrator.job_insights(job)).await
    }

    /// PDF extraction is CPU-bound, so it runs on the blocking pool.
    async fn parse_resume(
        &self,
        bytes: Bytes,
        format: DocumentFormat,
    ) -> Result<ResumeDocument, AppError> {
        let parser = self.parser.clone();
        tokio::task::spawn_blocking(move || parser.parse(&bytes, format))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("resume parsing task failed: {e}")))?
    }
}

fn check_upload(bytes: &[u8], label: &str) -> Result<DocumentFormat, AppError> {
    let format = DocumentFormat::from_label(label)?;
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(AppError::UnsupportedFormat(format!(
            "Document is {} bytes; the limit is {} bytes",
            bytes.len(),
            MAX_DOCUMENT_BYTES
        )));
    }
    Ok(format)
}

/// Keeps the context items whose category feeds one of the focus facets.
pub fn focus_context(items: Vec<ContextItem>, focus: &FocusSet) -> Vec<ContextItem> {
    items
        .into_iter()
        .filter(|item| focus.matches_category(&item.category))
        .collect()
}

/// Dropping the inner future cancels the in-flight model request.
async fn with_timeout<T>(
    limit: Duration,
    work: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Model work timed out after {:?}", limit);
            Err(AppError::ModelUnavailable(format!(
                "model call timed out after {:?}",
                limit
            )))
        }
    }
}
