//! Persistence interface consumed by the services.
//!
//! Each entity gets its own trait; `Store` bundles them so services can share
//! one `Arc<dyn Store>`. The job/applicant relation is owned here as a set of
//! `(job_id, applicant_id)` edges, and both directions are read from it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Applicant, Company, Job, User};
use crate::filter::JobQuery;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced row does not exist (or vanished mid-request)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write
    #[error("Duplicate record: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code().map(|c| c.into_owned());
            match code.as_deref() {
                // unique_violation
                Some("23505") => return StoreError::Conflict(db_err.message().to_string()),
                // foreign_key_violation
                Some("23503") => return StoreError::NotFound(db_err.message().to_string()),
                _ => {}
            }
        }

        let unavailable = matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        );
        if unavailable {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Query(err)
        }
    }
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn insert_company(&self, company: &Company) -> StoreResult<()>;
    async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>>;
    /// All companies ordered by name, then id
    async fn list_companies(&self) -> StoreResult<Vec<Company>>;
    async fn update_company(&self, company: &Company) -> StoreResult<()>;
    /// Removes the company together with its jobs and their applications
    async fn remove_company(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fails with `NotFound` when the referenced company does not exist
    async fn insert_job(&self, job: &Job) -> StoreResult<()>;
    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>>;
    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>>;
    async fn jobs_for_company(&self, company_id: Uuid) -> StoreResult<Vec<Job>>;
    async fn update_job(&self, job: &Job) -> StoreResult<()>;
    /// Removes the job and every application to it
    async fn remove_job(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ApplicantStore: Send + Sync {
    async fn insert_applicant(&self, applicant: &Applicant) -> StoreResult<()>;
    async fn find_applicant(&self, id: Uuid) -> StoreResult<Option<Applicant>>;
    /// All applicants ordered by name, then id
    async fn list_applicants(&self) -> StoreResult<Vec<Applicant>>;
    async fn update_applicant(&self, applicant: &Applicant) -> StoreResult<()>;
    /// Removes the applicant and every application they made
    async fn remove_applicant(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Atomically inserts the edge. Returns `false` if it already existed.
    async fn insert_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool>;
    /// Returns whether an edge was removed
    async fn remove_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool>;
    /// Applicants of a job ordered by name, then id
    async fn applicants_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Applicant>>;
    /// Jobs of an applicant ordered by title, then id
    async fn jobs_for_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Job>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait Store: CompanyStore + JobStore + ApplicantStore + ApplicationStore + UserStore {
    fn backend(&self) -> &'static str;
    async fn ping(&self) -> StoreResult<()>;
}
