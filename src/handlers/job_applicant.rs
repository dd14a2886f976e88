use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::format::LinkPayload;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JobApplications;

/// GET /api/v1/job_applicant - every job with its applicants
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<JobApplications>> {
    let applications = state.applications.list_applications().await?;
    Ok(ApiResponse::success(applications, "Job applications"))
}

/// POST /api/v1/job_applicant `{job_id, applicant_id}`
///
/// 404 when either side is missing, 409 with both ids echoed when the
/// applicant already applied.
pub async fn link(
    State(state): State<AppState>,
    payload: Result<Json<LinkPayload>, JsonRejection>,
) -> ApiResult<JobApplications> {
    let Json(payload) = payload?;
    let (job_id, applicant_id) = payload.ids()?;
    let job = state.applications.link_applicant_to_job(job_id, applicant_id).await?;
    Ok(ApiResponse::created(job, "Applicant added to job"))
}

/// DELETE /api/v1/job_applicant `{job_id, applicant_id}` - succeeds even if
/// the applicant never applied
pub async fn unlink(
    State(state): State<AppState>,
    payload: Result<Json<LinkPayload>, JsonRejection>,
) -> ApiResult<JobApplications> {
    let Json(payload) = payload?;
    let (job_id, applicant_id) = payload.ids()?;
    let job = state.applications.unlink_applicant_from_job(job_id, applicant_id).await?;
    Ok(ApiResponse::success(job, "Applicant removed from job"))
}
