// src/models/comment.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::models::profile::Profile;

/// Represents the 'post_comments' table in the database. Append-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Comment must be between 1 and 500 characters"
    ))]
    pub content: String,
}

/// A comment carrying its author profile for display.
/// The author is nullable: the profile row may not exist yet.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author: Option<Profile>,
}
