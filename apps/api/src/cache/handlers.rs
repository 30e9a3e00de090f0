use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::JobRecord;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const DEFAULT_SIMILAR_LIMIT: i64 = 5;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SimilarQuery {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    pub limit: Option<i64>,
}

/// GET /api/v1/jobs
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    let jobs = state
        .cache
        .history(params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/similar
pub async fn handle_similar(
    State(state): State<AppState>,
    Query(params): Query<SimilarQuery>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    let jobs = state
        .cache
        .similar(
            &params.job_title,
            &params.company,
            params.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT),
        )
        .await?;
    Ok(Json(jobs))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.cache.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
