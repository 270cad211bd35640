// src/core/interaction.rs

use crate::{
    error::AppError,
    models::{comment::CommentWithAuthor, post::LikeToggle},
    store::SocialStore,
    utils::html::clean_html,
};

/// Flips the (post, user) like membership: removes it when present, inserts
/// it when absent. Exactly one of the two happens per call.
///
/// The insert path is idempotent at the store (a concurrent duplicate insert
/// is a no-op, not an error), and the returned count is re-queried after the
/// flip rather than derived from a cached value, so concurrent toggles
/// converge to a consistent total.
pub async fn toggle_like(
    store: &dyn SocialStore,
    post_id: i64,
    user_id: &str,
) -> Result<LikeToggle, AppError> {
    let already_liked = store.viewer_has_liked(post_id, user_id).await?;

    if already_liked {
        store.delete_like(post_id, user_id).await?;
    } else {
        store.insert_like(post_id, user_id).await?;
    }

    let like_count = store.count_likes(post_id).await?;

    Ok(LikeToggle {
        liked: !already_liked,
        like_count,
    })
}

/// Stores a comment and returns it joined with its author profile, saving
/// callers a second round trip.
///
/// Content is trimmed before storage; empty-after-trim is a validation
/// failure, not a persistence failure. The stored text also passes through
/// the HTML cleaner as a stored-XSS fail-safe (plain text is unaffected).
pub async fn add_comment(
    store: &dyn SocialStore,
    post_id: i64,
    user_id: &str,
    content: &str,
) -> Result<CommentWithAuthor, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Comment cannot be empty".to_string()));
    }

    let cleaned = clean_html(trimmed);

    let comment = store.insert_comment(post_id, user_id, &cleaned).await?;
    let author = store.profile_by_user(user_id).await?;

    Ok(CommentWithAuthor {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        created_at: comment.created_at,
        author,
    })
}
