#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use job_board_api::api::{self, AppState};
use job_board_api::config::{AppConfig, Environment};
use job_board_api::store::{MemoryStore, Store};

/// In-process server over a fresh memory store
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_environment(Environment::Development))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let shared: Arc<dyn Store> = Arc::new(store.clone());
        let router = api::router(AppState::new(shared, &config), &config);
        Self { router, store }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json)?)
            }
            None => Body::empty(),
        };
        self.send_request(builder.body(body)?).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, body).await
    }

    /// Create a record and return the id reported by the 201 response
    async fn create(&self, uri: &str, body: Value) -> Result<String> {
        let (status, response) = self.post(uri, body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "POST {} failed: {} {}", uri, status, response);
        response["data"]["id"]
            .as_str()
            .map(str::to_string)
            .context("response without data.id")
    }

    pub async fn create_company(&self, name: &str, location: &str) -> Result<String> {
        self.create(
            "/api/v1/companies",
            json!({
                "name": name,
                "description": format!("{} builds software", name),
                "location": location,
                "contact": "jobs@example.com"
            }),
        )
        .await
    }

    pub async fn create_job(&self, title: &str, experience: &str, company_id: &str) -> Result<String> {
        self.create(
            "/api/v1/jobs",
            json!({
                "title": title,
                "description": "Build and run services",
                "required_skills": "Rust, SQL",
                "experience": experience,
                "company_id": company_id
            }),
        )
        .await
    }

    pub async fn create_applicant(&self, name: &str) -> Result<String> {
        self.create(
            "/api/v1/applicants",
            json!({
                "name": name,
                "contact": "555-0100",
                "job_preferences": "Backend, remote"
            }),
        )
        .await
    }
}

/// Titles of the jobs in a list response, in order
pub fn titles(response: &Value) -> Vec<String> {
    response["data"]
        .as_array()
        .map(|jobs| jobs.iter().filter_map(|j| j["title"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
