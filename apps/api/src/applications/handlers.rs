use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::{ApiJson, AppError};
use crate::models::application::{Application, ApplicationCreate};
use crate::state::AppState;

async fn require_job(state: &AppState, job_id: i64) -> Result<(), AppError> {
    state
        .store
        .get_job(job_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))
}

/// POST /jobs/:job_id/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    ApiJson(request): ApiJson<ApplicationCreate>,
) -> Result<Json<Application>, AppError> {
    request.validate()?;
    require_job(&state, job_id).await?;

    let application = state.store.create_application(job_id, &request).await?;
    Ok(Json(application))
}

/// GET /jobs/:job_id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<Vec<Application>>, AppError> {
    require_job(&state, job_id).await?;
    Ok(Json(state.store.list_applications(job_id).await?))
}
