use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::format::IdData;
use crate::api::AppState;
use crate::database::models::{Applicant, Job};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ApplicantChanges;
use crate::validation::parse_id;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Applicant>> {
    let applicants = state.applicants.list().await?;
    Ok(ApiResponse::success(applicants, "Applicants"))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ApplicantChanges>, JsonRejection>,
) -> ApiResult<IdData> {
    let Json(changes) = payload?;
    let applicant = state.applicants.create(changes).await?;
    Ok(ApiResponse::created(IdData { id: applicant.id }, "Applicant is created successfully"))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Applicant> {
    let id = parse_id("id", &id)?;
    let applicant = state.applicants.get(id).await?;
    Ok(ApiResponse::success(applicant, "Applicant"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ApplicantChanges>, JsonRejection>,
) -> ApiResult<Applicant> {
    let id = parse_id("id", &id)?;
    let Json(changes) = payload?;
    let applicant = state.applicants.update(id, changes).await?;
    Ok(ApiResponse::success(applicant, "Updated successfully"))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Applicant> {
    let id = parse_id("id", &id)?;
    let applicant = state.applicants.delete(id).await?;
    Ok(ApiResponse::success(applicant, "Deleted successfully"))
}

/// GET /api/v1/applicants/:id/jobs - jobs the applicant applied to
pub async fn jobs(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Job>> {
    let id = parse_id("id", &id)?;
    let jobs = state.applications.list_jobs_for_applicant(id).await?;
    Ok(ApiResponse::success(jobs, "Jobs"))
}
