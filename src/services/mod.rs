//! Business operations over the `Store`.
//!
//! Every service receives the store through its constructor so the HTTP layer,
//! the binary and the tests can wire in Postgres or memory alike.

pub mod applicant_service;
pub mod application_service;
pub mod company_service;
pub mod job_service;
pub mod user_service;

use thiserror::Error;
use uuid::Uuid;

use crate::filter::FilterError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

pub use applicant_service::{ApplicantChanges, ApplicantService};
pub use application_service::{ApplicationService, JobApplications};
pub use company_service::{CompanyChanges, CompanyDetail, CompanyService};
pub use job_service::{JobChanges, JobService};
pub use user_service::{Registration, UserService};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// The applicant is already linked to the job
    #[error("Applicant already exists")]
    AlreadyApplied { job_id: Uuid, applicant_id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("No attributes found")]
    EmptyChanges,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(report: validator::ValidationErrors) -> Self {
        ServiceError::Validation(report.into())
    }
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }
}

