// src/handlers/feed.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    core::feed,
    error::AppError,
    models::post::FeedParams,
    state::DynSocialStore,
    utils::jwt::Claims,
};

/// The viewer's home feed (recent posts, enriched with counts, viewer like
/// state and a recent-comments sample).
pub async fn get_feed(
    State(store): State<DynSocialStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).min(100); // Default 20, max 100

    let entries = feed::feed_for_viewer(store.as_ref(), &claims.sub, limit).await?;

    Ok(Json(entries))
}
