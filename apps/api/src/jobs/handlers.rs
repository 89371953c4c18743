use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::errors::{ApiJson, AppError};
use crate::models::job::{JobPosting, JobPostingCreate, JobPostingUpdate};
use crate::state::AppState;
use crate::store::{Page, RecordStore};

fn job_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Job posting {id} not found"))
}

/// Fails with NotFound unless `company_id` resolves.
async fn ensure_company_exists(store: &dyn RecordStore, company_id: i64) -> Result<(), AppError> {
    store
        .get_company(company_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Company {company_id} not found")))
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JobPostingCreate>,
) -> Result<Json<JobPosting>, AppError> {
    request.validate()?;
    ensure_company_exists(state.store.as_ref(), request.company_id).await?;

    let job = state.store.create_job(&request).await?;
    Ok(Json(job))
}

/// GET /jobs?skip=&limit=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(state.store.list_jobs(page).await?))
}

/// GET /jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobPosting>, AppError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| job_not_found(id))?;
    Ok(Json(job))
}

/// PUT /jobs/:id
///
/// A new `company_id` must resolve before anything is written.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<JobPostingUpdate>,
) -> Result<Json<JobPosting>, AppError> {
    let mut job = state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| job_not_found(id))?;

    if let Some(Some(company_id)) = update.company_id {
        ensure_company_exists(state.store.as_ref(), company_id).await?;
    }
    update.apply_to(&mut job)?;

    let saved = state
        .store
        .save_job(&job)
        .await?
        .ok_or_else(|| job_not_found(id))?;
    Ok(Json(saved))
}

/// DELETE /jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.store.delete_job(id).await? {
        return Err(job_not_found(id));
    }
    Ok(Json(json!({"message": "Job posting deleted successfully"})))
}
