pub mod format;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::services::{ApplicantService, ApplicationService, CompanyService, JobService, UserService};
use crate::store::Store;

/// Shared request state: the store plus the services built on it
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub companies: CompanyService,
    pub jobs: JobService,
    pub applicants: ApplicantService,
    pub applications: ApplicationService,
    pub users: UserService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        Self {
            companies: CompanyService::new(store.clone()),
            jobs: JobService::new(store.clone(), config.search.clone()),
            applicants: ApplicantService::new(store.clone()),
            applications: ApplicationService::new(store.clone()),
            users: UserService::new(store.clone(), config.security.password_min_length),
            store,
        }
    }
}

/// Full application router
pub fn router(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .nest("/api/v1", api_routes())
        .with_state(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }

    app.layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(company_routes())
        .merge(job_routes())
        .merge(applicant_routes())
        .merge(job_applicant_routes())
        .route("/register", post(handlers::register::post))
}

fn company_routes() -> Router<AppState> {
    use handlers::companies;

    Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/:id",
            get(companies::show).put(companies::update).delete(companies::delete),
        )
}

fn job_routes() -> Router<AppState> {
    use handlers::jobs;

    Router::new()
        .route("/jobs", get(jobs::search).post(jobs::create))
        .route("/jobs/:id", get(jobs::show).put(jobs::update).delete(jobs::delete))
        .route("/jobs/:id/applicants", get(jobs::applicants))
}

fn applicant_routes() -> Router<AppState> {
    use handlers::applicants;

    Router::new()
        .route("/applicants", get(applicants::list).post(applicants::create))
        .route(
            "/applicants/:id",
            get(applicants::show).put(applicants::update).delete(applicants::delete),
        )
        .route("/applicants/:id/jobs", get(applicants::jobs))
}

fn job_applicant_routes() -> Router<AppState> {
    use handlers::job_applicant;

    Router::new().route(
        "/job_applicant",
        get(job_applicant::list)
            .post(job_applicant::link)
            .delete(job_applicant::unlink),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") || origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
