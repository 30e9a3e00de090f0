use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::context::{ContextItem, CONTEXT_CATEGORIES};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct NewContextItem {
    pub category: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ContentUpdate {
    pub content: String,
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    /// Categories that currently hold at least one item.
    pub in_use: Vec<String>,
    /// Categories the UI offers by default.
    pub suggested: Vec<&'static str>,
}

/// GET /api/v1/context
pub async fn handle_list_context(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<Vec<ContextItem>>, AppError> {
    let category = params.category.as_deref().filter(|c| !c.trim().is_empty());
    let items = state.context.list(category).await?;
    Ok(Json(items))
}

/// POST /api/v1/context
pub async fn handle_add_context(
    State(state): State<AppState>,
    Json(req): Json<NewContextItem>,
) -> Result<(StatusCode, Json<ContextItem>), AppError> {
    let item = state.context.add(&req.category, &req.content).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/context/categories
pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let in_use = state.context.categories().await?;
    Ok(Json(CategoriesResponse {
        in_use,
        suggested: CONTEXT_CATEGORIES.to_vec(),
    }))
}

/// PATCH /api/v1/context/:id
pub async fn handle_update_context(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ContentUpdate>,
) -> Result<Json<ContextItem>, AppError> {
    let item = state.context.update(id, &req.content).await?;
    Ok(Json(item))
}

/// DELETE /api/v1/context/:id
pub async fn handle_delete_context(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.context.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
