use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::format::IdData;
use crate::api::AppState;
use crate::database::models::Company;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CompanyChanges, CompanyDetail};
use crate::validation::parse_id;

/// GET /api/v1/companies
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Company>> {
    let companies = state.companies.list().await?;
    Ok(ApiResponse::success(companies, "Companies"))
}

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CompanyChanges>, JsonRejection>,
) -> ApiResult<IdData> {
    let Json(changes) = payload?;
    let company = state.companies.create(changes).await?;
    Ok(ApiResponse::created(IdData { id: company.id }, "Company is created successfully"))
}

/// GET /api/v1/companies/:id - company with its jobs
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<CompanyDetail> {
    let id = parse_id("id", &id)?;
    let detail = state.companies.get(id).await?;
    Ok(ApiResponse::success(detail, "Company"))
}

/// PUT /api/v1/companies/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CompanyChanges>, JsonRejection>,
) -> ApiResult<Company> {
    let id = parse_id("id", &id)?;
    let Json(changes) = payload?;
    let company = state.companies.update(id, changes).await?;
    Ok(ApiResponse::success(company, "Updated successfully"))
}

/// DELETE /api/v1/companies/:id - also removes the company's jobs
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<IdData> {
    let id = parse_id("id", &id)?;
    let id = state.companies.delete(id).await?;
    Ok(ApiResponse::success(IdData { id }, "Deleted successfully"))
}
