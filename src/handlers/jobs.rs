use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::api::format::IdData;
use crate::api::AppState;
use crate::database::models::{Applicant, Job};
use crate::filter::{JobFilter, Page};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JobChanges;
use crate::validation::parse_id;

/// GET /api/v1/jobs?title=&company=&location=&experience=&limit=&offset=
///
/// Every filter is an optional case-insensitive substring match; present
/// filters are AND-ed and results come back ordered by title, then id.
pub async fn search(
    State(state): State<AppState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
    page: Result<Query<Page>, QueryRejection>,
) -> ApiResult<Vec<Job>> {
    let Query(filter) = filter?;
    let Query(page) = page?;
    let jobs = state.jobs.search(&filter, page).await?;
    Ok(ApiResponse::success(jobs, "Jobs"))
}

/// POST /api/v1/jobs
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<JobChanges>, JsonRejection>,
) -> ApiResult<IdData> {
    let Json(changes) = payload?;
    let job = state.jobs.create(changes).await?;
    Ok(ApiResponse::created(IdData { id: job.id }, "Job is created successfully"))
}

/// GET /api/v1/jobs/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let id = parse_id("id", &id)?;
    let job = state.jobs.get(id).await?;
    Ok(ApiResponse::success(job, "Job"))
}

/// PUT /api/v1/jobs/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JobChanges>, JsonRejection>,
) -> ApiResult<Job> {
    let id = parse_id("id", &id)?;
    let Json(changes) = payload?;
    let job = state.jobs.update(id, changes).await?;
    Ok(ApiResponse::success(job, "Updated successfully"))
}

/// DELETE /api/v1/jobs/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let id = parse_id("id", &id)?;
    let job = state.jobs.delete(id).await?;
    Ok(ApiResponse::success(job, "Deleted successfully"))
}

/// GET /api/v1/jobs/:id/applicants
pub async fn applicants(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Applicant>> {
    let id = parse_id("id", &id)?;
    let applicants = state.applications.list_applicants_for_job(id).await?;
    Ok(ApiResponse::success(applicants, "Applicants"))
}
