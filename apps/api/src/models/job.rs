use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::tailoring::TailoringResult;

/// Raw `job_descriptions` row. `optimized_resume` holds the serialized
/// `TailoringResult`, or NULL for a pending/failed attempt.
#[derive(Debug, Clone, FromRow)]
pub struct JobDescriptionRow {
    pub id: i64,
    pub job_title: String,
    pub company: String,
    pub description: String,
    pub optimized_resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub fingerprint: Option<String>,
    pub normalized_key: Option<String>,
}

/// A job posting together with the tailoring produced for it, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    pub job_title: String,
    pub company: String,
    pub description: String,
    pub optimized_resume: Option<TailoringResult>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<JobDescriptionRow> for JobRecord {
    type Error = AppError;

    fn try_from(row: JobDescriptionRow) -> Result<Self, Self::Error> {
        let optimized_resume = row
            .optimized_resume
            .as_deref()
            .map(serde_json::from_str::<TailoringResult>)
            .transpose()
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Stored result for job {} is unreadable: {e}",
                    row.id
                ))
            })?;

        Ok(JobRecord {
            id: row.id,
            job_title: row.job_title,
            company: row.company,
            description: row.description,
            optimized_resume,
            created_at: row.created_at,
        })
    }
}

/// The posting a resume is being tailored for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_title: String,
    pub company: String,
    pub description: String,
}

impl JobPosting {
    pub fn new(
        job_title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            company: company.into(),
            description: description.into(),
        }
    }

    /// All three fields are required.
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("job_title", &self.job_title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Model-derived reading of a job posting. Not cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobInsights {
    pub key_skills: Vec<String>,
    pub experience_level: String,
    pub industry: String,
    pub salary_range: Option<String>,
    pub growth_opportunities: Vec<String>,
    pub culture_indicators: Vec<String>,
}
