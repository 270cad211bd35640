// src/core/feed.rs

use std::collections::{HashMap, HashSet};

use crate::{
    error::AppError,
    models::{
        comment::CommentWithAuthor,
        post::{FeedEntry, PostCount, PostWithAuthor},
    },
    store::SocialStore,
};

/// How many recent comments ride along with each feed entry.
pub const RECENT_COMMENT_LIMIT: usize = 2;

/// Assembles feed entries from independently fetched relations.
///
/// * Base post order is preserved (the store's contract: newest first).
/// * A post absent from a grouped count relation has zero likes/comments;
///   grouped COUNT(*) queries produce no row for it.
/// * `comments` arrive newest first; the first two per post are kept.
///
/// Pure over its inputs; the zero-default logic lives here rather than being
/// implied by a left join.
pub fn build_feed(
    posts: Vec<PostWithAuthor>,
    like_counts: &[PostCount],
    comment_counts: &[PostCount],
    viewer_like_ids: &[i64],
    comments: Vec<CommentWithAuthor>,
) -> Vec<FeedEntry> {
    let like_map: HashMap<i64, i64> = like_counts.iter().map(|r| (r.post_id, r.count)).collect();
    let comment_map: HashMap<i64, i64> = comment_counts
        .iter()
        .map(|r| (r.post_id, r.count))
        .collect();
    let viewer_likes: HashSet<i64> = viewer_like_ids.iter().copied().collect();

    let mut recent: HashMap<i64, Vec<CommentWithAuthor>> = HashMap::new();
    for comment in comments {
        let bucket = recent.entry(comment.post_id).or_default();
        if bucket.len() < RECENT_COMMENT_LIMIT {
            bucket.push(comment);
        }
    }

    posts
        .into_iter()
        .map(|item| FeedEntry {
            like_count: like_map.get(&item.post.id).copied().unwrap_or(0),
            comment_count: comment_map.get(&item.post.id).copied().unwrap_or(0),
            viewer_has_liked: viewer_likes.contains(&item.post.id),
            recent_comments: recent.remove(&item.post.id).unwrap_or_default(),
            post: item.post,
            author: item.author,
        })
        .collect()
}

/// The viewer's home feed: the most recent posts window, enriched.
pub async fn feed_for_viewer(
    store: &dyn SocialStore,
    viewer_id: &str,
    limit: i64,
) -> Result<Vec<FeedEntry>, AppError> {
    let base = store.recent_posts(limit).await?;
    assemble(store, viewer_id, base).await
}

/// A single user's posts as feed entries, viewer-relative.
pub async fn posts_for_user(
    store: &dyn SocialStore,
    owner_id: &str,
    viewer_id: &str,
) -> Result<Vec<FeedEntry>, AppError> {
    let base = store.posts_by_user(owner_id).await?;
    assemble(store, viewer_id, base).await
}

async fn assemble(
    store: &dyn SocialStore,
    viewer_id: &str,
    base: Vec<PostWithAuthor>,
) -> Result<Vec<FeedEntry>, AppError> {
    if base.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i64> = base.iter().map(|item| item.post.id).collect();

    let like_counts = store.like_counts(&post_ids).await?;
    let comment_counts = store.comment_counts(&post_ids).await?;
    let viewer_like_ids = store.viewer_like_ids(viewer_id, &post_ids).await?;
    let comments = store.comments_for_posts(&post_ids).await?;

    Ok(build_feed(
        base,
        &like_counts,
        &comment_counts,
        &viewer_like_ids,
        comments,
    ))
}
