use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::errors::{ApiJson, AppError};
use crate::models::company::{Company, CompanyCreate, CompanyUpdate};
use crate::state::AppState;
use crate::store::Page;

fn company_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Company {id} not found"))
}

/// POST /companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CompanyCreate>,
) -> Result<Json<Company>, AppError> {
    request.validate()?;
    let company = state.store.create_company(&request).await?;
    Ok(Json(company))
}

/// GET /companies?skip=&limit=
pub async fn handle_list_companies(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Company>>, AppError> {
    Ok(Json(state.store.list_companies(page).await?))
}

/// GET /companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Company>, AppError> {
    let company = state
        .store
        .get_company(id)
        .await?
        .ok_or_else(|| company_not_found(id))?;
    Ok(Json(company))
}

/// PUT /companies/:id
pub async fn handle_update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<CompanyUpdate>,
) -> Result<Json<Company>, AppError> {
    let mut company = state
        .store
        .get_company(id)
        .await?
        .ok_or_else(|| company_not_found(id))?;

    update.apply_to(&mut company)?;

    let saved = state
        .store
        .save_company(&company)
        .await?
        .ok_or_else(|| company_not_found(id))?;
    Ok(Json(saved))
}

/// DELETE /companies/:id
pub async fn handle_delete_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.store.delete_company(id).await? {
        return Err(company_not_found(id));
    }
    Ok(Json(json!({"message": "Company deleted successfully"})))
}
