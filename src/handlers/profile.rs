// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    core::profile,
    error::AppError,
    models::profile::UpdateProfileRequest,
    state::DynSocialStore,
    utils::jwt::Claims,
};

/// Get the caller's profile, creating it on first touch.
pub async fn get_me(
    State(store): State<DynSocialStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let me = profile::ensure_profile(store.as_ref(), &claims.sub, claims.name.as_deref(), None)
        .await?;

    Ok(Json(me))
}

/// Update the caller's profile. Username conflicts are rejected.
pub async fn update_profile(
    State(store): State<DynSocialStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = profile::update_profile(store.as_ref(), &claims.sub, payload).await?;

    Ok(Json(updated))
}

/// A user's profile page: profile, posts as feed entries, stats and
/// viewer-relative state.
pub async fn get_user_page(
    State(store): State<DynSocialStore>,
    Extension(claims): Extension<Claims>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let page = profile::profile_page(store.as_ref(), &username, &claims.sub).await?;

    Ok(Json(page))
}
