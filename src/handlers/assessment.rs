// src/handlers/assessment.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    core::scoring,
    error::AppError,
    models::{
        assessment::{AssessmentDetail, PublicQuestion},
        attempt::SubmitTestRequest,
    },
    state::DynAssessmentStore,
    utils::jwt::Claims,
};

/// List all assessments (dashboard data).
pub async fn list_assessments(
    State(store): State<DynAssessmentStore>,
) -> Result<impl IntoResponse, AppError> {
    let assessments = store.list_assessments().await?;

    Ok(Json(assessments))
}

/// Get one assessment with its questions, ordered by position.
/// The correct option never leaves the server (hidden by the DTO).
pub async fn get_assessment(
    State(store): State<DynAssessmentStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let assessment = store
        .assessment(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))?;

    let questions: Vec<PublicQuestion> = store
        .questions_for_assessment(id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(AssessmentDetail {
        assessment,
        questions,
    }))
}

/// Submits a user's answers and records the scored attempt.
pub async fn submit_test(
    State(store): State<DynAssessmentStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let result = scoring::submit_test(store.as_ref(), &claims.sub, &payload).await?;

    Ok(Json(result))
}

/// List the caller's attempts, newest first.
pub async fn list_my_attempts(
    State(store): State<DynAssessmentStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = store.attempts_for_user(&claims.sub).await?;

    Ok(Json(attempts))
}

/// Results view for one attempt: per-question records plus percentage and
/// grade. Only the attempt's owner can see it.
pub async fn get_results(
    State(store): State<DynAssessmentStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let results = scoring::attempt_results(store.as_ref(), &claims.sub, id).await?;

    Ok(Json(results))
}
