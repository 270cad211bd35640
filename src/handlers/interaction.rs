// src/handlers/interaction.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    core::interaction,
    error::AppError,
    models::comment::CreateCommentRequest,
    state::DynSocialStore,
    utils::jwt::Claims,
};

/// Toggle Like on a post.
pub async fn toggle_like(
    State(store): State<DynSocialStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = interaction::toggle_like(store.as_ref(), post_id, &claims.sub).await?;

    Ok(Json(result))
}

/// Create a new comment on a post.
pub async fn create_comment(
    State(store): State<DynSocialStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let comment =
        interaction::add_comment(store.as_ref(), post_id, &claims.sub, &payload.content).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
