use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::format::EmailData;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Registration;

/// POST /api/v1/register `{email, password}`
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> ApiResult<EmailData> {
    let Json(registration) = payload?;
    let user = state.users.register(registration).await?;
    Ok(ApiResponse::created(EmailData { email: user.email }, "User created"))
}
