use std::sync::Arc;

use crate::config::SearchConfig;
use crate::database::models::{Applicant, Company, Job};
use crate::services::{
    ApplicantChanges, ApplicantService, ApplicationService, CompanyChanges, CompanyService, JobChanges,
    JobService, UserService,
};
use crate::store::{MemoryStore, Store};

/// Services wired to a fresh memory store, plus fixture helpers
pub struct TestContext {
    pub store: MemoryStore,
    pub companies: CompanyService,
    pub jobs: JobService,
    pub applicants: ApplicantService,
    pub applications: ApplicationService,
    pub users: UserService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let shared: Arc<dyn Store> = Arc::new(store.clone());
        let search = SearchConfig { max_limit: Some(1000), debug_logging: true };

        Self {
            companies: CompanyService::new(shared.clone()),
            jobs: JobService::new(shared.clone(), search),
            applicants: ApplicantService::new(shared.clone()),
            applications: ApplicationService::new(shared.clone()),
            users: UserService::new(shared, 6),
            store,
        }
    }

    pub async fn company(&self, name: &str, location: &str) -> Company {
        self.companies
            .create(CompanyChanges {
                name: Some(name.to_string()),
                description: Some(format!("{} builds software", name)),
                location: Some(location.to_string()),
                contact: Some("jobs@example.com".to_string()),
            })
            .await
            .expect("create test company")
    }

    pub async fn job(&self, title: &str, experience: &str, company: &Company) -> Job {
        self.jobs
            .create(JobChanges {
                title: Some(title.to_string()),
                description: Some(format!("{} at {}", title, company.name)),
                required_skills: Some("Rust, SQL".to_string()),
                experience: Some(experience.to_string()),
                company_id: Some(company.id.to_string()),
            })
            .await
            .expect("create test job")
    }

    pub async fn applicant(&self, name: &str) -> Applicant {
        self.applicants
            .create(ApplicantChanges {
                name: Some(name.to_string()),
                contact: Some("555-0100".to_string()),
                job_preferences: Some("Backend, remote".to_string()),
            })
            .await
            .expect("create test applicant")
    }
}
