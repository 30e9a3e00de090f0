//! Context Store — user-supplied facts kept between sessions.
//!
//! Every write runs inside a transaction while holding the shared writer lock.

use chrono::Utc;
use tracing::info;

use crate::db::Database;
use crate::errors::AppError;
use crate::models::context::ContextItem;

#[derive(Clone)]
pub struct ContextStore {
    db: Database,
}

impl ContextStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn add(&self, category: &str, content: &str) -> Result<ContextItem, AppError> {
        let category = normalize_category(category)?;
        let content = require_content(content)?;
        let now = Utc::now();

        let _guard = self.db.writer().await;
        let mut tx = self.db.pool().begin().await?;
        let item: ContextItem = sqlx::query_as(
            r#"
            INSERT INTO user_context (category, content, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, category, content, created_at, updated_at
            "#,
        )
        .bind(&category)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        info!("Added context item {} ({})", item.id, item.category);
        Ok(item)
    }

    /// Oldest first. `None` lists every category.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<ContextItem>, AppError> {
        let items = match category.map(normalize_category).transpose()? {
            Some(category) => {
                sqlx::query_as(
                    r#"
                    SELECT id, category, content, created_at, updated_at
                    FROM user_context
                    WHERE category = ?
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .bind(category)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, category, content, created_at, updated_at
                    FROM user_context
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .fetch_all(self.db.pool())
                .await?
            }
        };
        Ok(items)
    }

    /// Replaces the content and bumps `updated_at`. The category is fixed.
    pub async fn update(&self, id: i64, content: &str) -> Result<ContextItem, AppError> {
        let content = require_content(content)?;

        let _guard = self.db.writer().await;
        let mut tx = self.db.pool().begin().await?;
        let item: Option<ContextItem> = sqlx::query_as(
            r#"
            UPDATE user_context
            SET content = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, category, content, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let item = item.ok_or_else(|| AppError::NotFound(format!("Context item {id} not found")))?;
        tx.commit().await?;
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let _guard = self.db.writer().await;
        let mut tx = self.db.pool().begin().await?;
        let result = sqlx::query("DELETE FROM user_context WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Context item {id} not found")));
        }
        tx.commit().await?;

        info!("Deleted context item {id}");
        Ok(())
    }

    /// Distinct categories in use, sorted.
    pub async fn categories(&self) -> Result<Vec<String>, AppError> {
        let categories =
            sqlx::query_scalar("SELECT DISTINCT category FROM user_context ORDER BY category")
                .fetch_all(self.db.pool())
                .await?;
        Ok(categories)
    }
}

fn normalize_category(raw: &str) -> Result<String, AppError> {
    let category = raw.trim().to_lowercase();
    if category.is_empty() {
        return Err(AppError::Validation("category must not be empty".into()));
    }
    Ok(category)
}

fn require_content(raw: &str) -> Result<&str, AppError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }
    Ok(content)
}
