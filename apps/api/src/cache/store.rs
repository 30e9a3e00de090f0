//! Optimization Cache — tailoring results keyed by job fingerprint.
//!
//! Lookup only ever returns complete records (`optimized_resume IS NOT NULL`)
//! whose stored normalized key matches the request, newest first with the
//! highest id breaking ties. `store` is an upsert under the shared writer lock,
//! so a fingerprint never has more than one complete record written by us.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::fingerprint::{fingerprint, normalize_key};
use crate::db::Database;
use crate::errors::AppError;
use crate::models::job::{JobDescriptionRow, JobRecord};
use crate::models::tailoring::TailoringResult;

const JOB_COLUMNS: &str = "id, job_title, company, description, optimized_resume, created_at, fingerprint, normalized_key";

/// Upper bound for `history` and `similar`.
pub const MAX_LISTING: i64 = 100;

#[derive(Clone)]
pub struct OptimizationCache {
    db: Database,
}

impl OptimizationCache {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn lookup(
        &self,
        job_title: &str,
        company: &str,
        description: &str,
    ) -> Result<Option<JobRecord>, AppError> {
        let key = normalize_key(job_title, company, description);
        let fp = fingerprint(&key);

        let rows: Vec<JobDescriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM job_descriptions
            WHERE fingerprint = ? AND optimized_resume IS NOT NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(&fp)
        .fetch_all(self.db.pool())
        .await?;

        match pick_matching(rows, &key, &fp) {
            Some(row) => {
                debug!("Cache hit for {} (job {})", &fp[..12], row.id);
                Ok(Some(JobRecord::try_from(row)?))
            }
            None => {
                debug!("Cache miss for {}", &fp[..12]);
                Ok(None)
            }
        }
    }

    /// Overwrites the result and timestamp of the existing complete record for
    /// this fingerprint, or inserts a new one.
    pub async fn store(
        &self,
        job_title: &str,
        company: &str,
        description: &str,
        result: &TailoringResult,
    ) -> Result<JobRecord, AppError> {
        let key = normalize_key(job_title, company, description);
        let fp = fingerprint(&key);
        let payload = serde_json::to_string(result)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serializing result: {e}")))?;
        let now = Utc::now();

        let _guard = self.db.writer().await;
        let mut tx = self.db.pool().begin().await?;

        let existing: Vec<JobDescriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM job_descriptions
            WHERE fingerprint = ? AND optimized_resume IS NOT NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(&fp)
        .fetch_all(&mut *tx)
        .await?;

        let row: JobDescriptionRow = match pick_matching(existing, &key, &fp) {
            Some(current) => {
                sqlx::query_as(&format!(
                    r#"
                    UPDATE job_descriptions
                    SET optimized_resume = ?, created_at = ?
                    WHERE id = ?
                    RETURNING {JOB_COLUMNS}
                    "#
                ))
                .bind(&payload)
                .bind(now)
                .bind(current.id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    r#"
                    INSERT INTO job_descriptions
                        (job_title, company, description, optimized_resume, created_at, fingerprint, normalized_key)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    RETURNING {JOB_COLUMNS}
                    "#
                ))
                .bind(job_title.trim())
                .bind(company.trim())
                .bind(description.trim())
                .bind(&payload)
                .bind(now)
                .bind(&fp)
                .bind(&key)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        info!("Stored tailoring result for job {} ({})", row.id, &fp[..12]);

        JobRecord::try_from(row)
    }

    /// Most recent complete records first.
    pub async fn history(&self, limit: i64) -> Result<Vec<JobRecord>, AppError> {
        let rows: Vec<JobDescriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM job_descriptions
            WHERE optimized_resume IS NOT NULL
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#
        ))
        .bind(limit.clamp(1, MAX_LISTING))
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(JobRecord::try_from).collect()
    }

    /// Records whose title or company contains the given text, case-insensitively.
    /// A blank argument does not match anything.
    pub async fn similar(
        &self,
        job_title: &str,
        company: &str,
        limit: i64,
    ) -> Result<Vec<JobRecord>, AppError> {
        let title = job_title.trim().to_lowercase();
        let company = company.trim().to_lowercase();
        if title.is_empty() && company.is_empty() {
            return Err(AppError::Validation(
                "job_title or company is required".into(),
            ));
        }

        let rows: Vec<JobDescriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM job_descriptions
            WHERE (?1 != '' AND instr(lower(job_title), ?1) > 0)
               OR (?2 != '' AND instr(lower(company), ?2) > 0)
            ORDER BY created_at DESC, id DESC
            LIMIT ?3
            "#
        ))
        .bind(&title)
        .bind(&company)
        .bind(limit.clamp(1, MAX_LISTING))
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(JobRecord::try_from).collect()
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let _guard = self.db.writer().await;
        let mut tx = self.db.pool().begin().await?;
        let result = sqlx::query("DELETE FROM job_descriptions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job {id} not found")));
        }
        tx.commit().await?;

        info!("Deleted job {id}");
        Ok(())
    }
}

/// First row (already in tie-break order) whose normalized key matches.
fn pick_matching(
    rows: Vec<JobDescriptionRow>,
    key: &str,
    fp: &str,
) -> Option<JobDescriptionRow> {
    let mut matching = None;
    for row in rows {
        if row.normalized_key.as_deref() == Some(key) {
            matching = Some(row);
            break;
        }
        warn!(
            "Fingerprint collision on {}: job {} has a different key",
            &fp[..12],
            row.id
        );
    }
    matching
}
