use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::api::AppState;

/// GET / - service descriptor
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "message": "Job Board API",
        "data": {
            "name": "Job Board API",
            "version": version,
            "store": state.store.backend(),
            "endpoints": {
                "companies": "/api/v1/companies[/:id]",
                "jobs": "/api/v1/jobs[/:id][/applicants] (search: title, company, location, experience, limit, offset)",
                "applicants": "/api/v1/applicants[/:id][/jobs]",
                "job_applicant": "/api/v1/job_applicant",
                "register": "/api/v1/register",
                "health": "/health",
            }
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "ok",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": state.store.backend()
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "store unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": state.store.backend()
                    }
                })),
            )
        }
    }
}
