use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{JobInsights, JobPosting};
use crate::models::resume::ResumeDocument;
use crate::models::tailoring::FocusSet;
use crate::resume::assessment::ResumeAssessment;
use crate::state::AppState;
use crate::tailoring::pipeline::{TailorRequest, TailoringOutcome};

/// Longest caller-supplied model deadline.
const MAX_TIMEOUT_SECS: u64 = 600;

#[derive(Serialize)]
pub struct TailorResponse {
    #[serde(flatten)]
    pub outcome: TailoringOutcome,
    /// Plain-text change report for download next to the tailored resume.
    pub change_summary: String,
}

#[derive(Deserialize)]
pub struct InsightsRequest {
    pub job_title: String,
    pub company: String,
    pub description: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Serialize)]
pub struct ResumeCheckResponse {
    pub assessment: ResumeAssessment,
    pub document: ResumeDocument,
}

/// POST /api/v1/tailor
/// Multipart: `resume` (file), `job_title`, `company`, `description`,
/// optional `focus` (comma list) and `timeout_secs`.
pub async fn handle_tailor(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TailorResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let (format, resume_bytes) = form.take_resume()?;

    let req = TailorRequest {
        resume_bytes,
        format,
        job: JobPosting::new(
            form.text("job_title"),
            form.text("company"),
            form.text("description"),
        ),
        focus: FocusSet::parse_list(&form.text("focus"))?,
        timeout: parse_timeout(form.fields.get("timeout_secs").map(String::as_str))?,
    };

    let outcome = state.pipeline.tailor_resume(req).await?;
    info!(
        "Tailoring for job {} done (cached: {}, {} changes)",
        outcome.job_id,
        outcome.from_cache,
        outcome.result.change_list.len()
    );

    let change_summary = outcome.result.change_summary();
    Ok(Json(TailorResponse {
        outcome,
        change_summary,
    }))
}

/// POST /api/v1/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    Json(req): Json<InsightsRequest>,
) -> Result<Json<JobInsights>, AppError> {
    let timeout = check_timeout(req.timeout_secs)?;
    let job = JobPosting::new(req.job_title, req.company, req.description);
    let insights = state.pipeline.job_insights(&job, timeout).await?;
    Ok(Json(insights))
}

/// POST /api/v1/resume/assess
/// Multipart: `resume` (file).
pub async fn handle_assess(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeCheckResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let (format, bytes) = form.take_resume()?;

    let document = state.pipeline.inspect_resume(bytes, &format).await?;
    Ok(Json(ResumeCheckResponse {
        assessment: document.assess(),
        document,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart form reading
// ────────────────────────────────────────────────────────────────────────────

struct UploadForm {
    /// (format label, bytes). The label is the file name, or the content type
    /// when the client sent no file name.
    resume: Option<(String, Bytes)>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm {
            resume: None,
            fields: HashMap::new(),
        };

        while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "resume" {
                let label = field
                    .file_name()
                    .or(field.content_type())
                    .unwrap_or_default()
                    .to_string();
                let data = field.bytes().await.map_err(upload_error)?;
                form.resume = Some((label, data));
            } else {
                let value = field.text().await.map_err(upload_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn take_resume(&mut self) -> Result<(String, Bytes), AppError> {
        self.resume
            .take()
            .ok_or_else(|| AppError::Validation("multipart field 'resume' is required".into()))
    }

    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

/// Oversized bodies count as an unsupported upload, like oversized files.
fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UnsupportedFormat(format!("Upload is too large: {}", e.body_text()))
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<Duration>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let secs = raw.parse::<u64>().map_err(|_| {
        AppError::Validation(format!(
            "timeout_secs must be a whole number of seconds, got '{raw}'"
        ))
    })?;
    check_timeout(Some(secs))
}

/// Same bounds for multipart and JSON callers.
fn check_timeout(secs: Option<u64>) -> Result<Option<Duration>, AppError> {
    match secs {
        None => Ok(None),
        Some(secs) if (1..=MAX_TIMEOUT_SECS).contains(&secs) => Ok(Some(Duration::from_secs(secs))),
        Some(secs) => Err(AppError::Validation(format!(
            "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"
        ))),
    }
}
