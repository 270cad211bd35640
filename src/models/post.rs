// src/models/post.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::models::{comment::CommentWithAuthor, profile::Profile};

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: String,
    pub image_url: String,
    pub caption: Option<String>,

    /// 'public' or 'friends'.
    pub visibility: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A post joined with its author profile, as returned by the base feed query.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<Profile>,
}

/// One row of a grouped COUNT(*) query. Posts with zero rows in the grouped
/// relation produce no entry at all.
#[derive(Debug, Clone, FromRow)]
pub struct PostCount {
    pub post_id: i64,
    pub count: i64,
}

/// A post enriched with derived counts and viewer-relative state.
/// Recomputed per request, never persisted.
#[derive(Debug, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    pub author: Option<Profile>,
    pub like_count: i64,
    pub comment_count: i64,
    pub viewer_has_liked: bool,
    pub recent_comments: Vec<CommentWithAuthor>,
}

/// Result of a like toggle. The count is re-queried after the flip, not
/// derived from a cached value.
#[derive(Debug, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}

/// Query parameters for feed listing.
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub limit: Option<i64>,
}
