//! Axum route handlers for the Description API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::description::composer::parse_description;
use crate::description::generator::{
    generate_job_description, DescriptionRequest, DescriptionResponse,
};
use crate::errors::{ApiJson, AppError};
use crate::state::AppState;

/// POST /jobs/:job_id/description
///
/// Generates a structured description with the configured model, stores the
/// composed text on the job posting and returns the structured fields.
pub async fn handle_generate_description(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    ApiJson(request): ApiJson<DescriptionRequest>,
) -> Result<Json<DescriptionResponse>, AppError> {
    let response = generate_job_description(
        state.store.as_ref(),
        state.generator.as_ref(),
        job_id,
        request,
    )
    .await?;

    Ok(Json(response))
}

/// GET /jobs/:job_id/description
///
/// Returns the stored description split back into its structured sections.
/// 422 when the stored text was not produced by the composer.
pub async fn handle_get_description(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<DescriptionResponse>, AppError> {
    let job = state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))?;

    let text = job
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} has no description")))?;

    let structured_description = parse_description(&text)
        .map_err(|e| AppError::UnprocessableEntity(format!("Job posting {job_id}: {e}")))?;

    Ok(Json(DescriptionResponse {
        job_id,
        structured_description,
    }))
}
