use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user-supplied fact (project, achievement, skill…) kept outside the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContextItem {
    pub id: i64,
    pub category: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Categories offered to users when adding context.
pub const CONTEXT_CATEGORIES: &[&str] = &[
    "experience",
    "project",
    "achievement",
    "skill",
    "certification",
    "education",
    "volunteer",
    "publication",
    "award",
    "other",
];
