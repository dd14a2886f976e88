use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Applicant, Company, Job, User};
use crate::filter::JobQuery;

use super::{
    ApplicantStore, ApplicationStore, CompanyStore, JobStore, Store, StoreError, StoreResult,
    UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    companies: HashMap<Uuid, Company>,
    jobs: HashMap<Uuid, Job>,
    applicants: HashMap<Uuid, Applicant>,
    /// (job_id, applicant_id); the set itself is the uniqueness constraint
    applications: BTreeSet<(Uuid, Uuid)>,
    users: HashMap<String, User>,
}

impl Tables {
    fn drop_job(&mut self, job_id: Uuid) -> bool {
        let removed = self.jobs.remove(&job_id).is_some();
        if removed {
            self.applications.retain(|(job, _)| *job != job_id);
        }
        removed
    }
}

/// In-process store. Every call holds the lock only for its own duration.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored application edges
    pub async fn application_count(&self) -> usize {
        self.tables.read().await.applications.len()
    }
}

fn by_title(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}

fn by_name(applicants: &mut [Applicant]) {
    applicants.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert_company(&self, company: &Company) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.companies.contains_key(&company.id) {
            return Err(StoreError::Conflict(format!("company {}", company.id)));
        }
        tables.companies.insert(company.id, company.clone());
        Ok(())
    }

    async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        let mut companies: Vec<Company> = self.tables.read().await.companies.values().cloned().collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(companies)
    }

    async fn update_company(&self, company: &Company) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.companies.get_mut(&company.id) {
            Some(existing) => {
                *existing = company.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("company {}", company.id))),
        }
    }

    async fn remove_company(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.companies.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<Uuid> = tables
            .jobs
            .values()
            .filter(|job| job.company_id == id)
            .map(|job| job.id)
            .collect();
        for job_id in owned {
            tables.drop_job(job_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.companies.contains_key(&job.company_id) {
            return Err(StoreError::NotFound(format!("company {}", job.company_id)));
        }
        if tables.jobs.contains_key(&job.id) {
            return Err(StoreError::Conflict(format!("job {}", job.id)));
        }
        tables.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        let rows = tables
            .jobs
            .values()
            .filter_map(|job| tables.companies.get(&job.company_id).map(|company| (job, company)));
        Ok(query.run(rows))
    }

    async fn jobs_for_company(&self, company_id: Uuid) -> StoreResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .tables
            .read()
            .await
            .jobs
            .values()
            .filter(|job| job.company_id == company_id)
            .cloned()
            .collect();
        by_title(&mut jobs);
        Ok(jobs)
    }

    async fn update_job(&self, job: &Job) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.companies.contains_key(&job.company_id) {
            return Err(StoreError::NotFound(format!("company {}", job.company_id)));
        }
        match tables.jobs.get_mut(&job.id) {
            Some(existing) => {
                *existing = job.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("job {}", job.id))),
        }
    }

    async fn remove_job(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.drop_job(id))
    }
}

#[async_trait]
impl ApplicantStore for MemoryStore {
    async fn insert_applicant(&self, applicant: &Applicant) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.applicants.contains_key(&applicant.id) {
            return Err(StoreError::Conflict(format!("applicant {}", applicant.id)));
        }
        tables.applicants.insert(applicant.id, applicant.clone());
        Ok(())
    }

    async fn find_applicant(&self, id: Uuid) -> StoreResult<Option<Applicant>> {
        Ok(self.tables.read().await.applicants.get(&id).cloned())
    }

    async fn list_applicants(&self) -> StoreResult<Vec<Applicant>> {
        let mut applicants: Vec<Applicant> =
            self.tables.read().await.applicants.values().cloned().collect();
        by_name(&mut applicants);
        Ok(applicants)
    }

    async fn update_applicant(&self, applicant: &Applicant) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.applicants.get_mut(&applicant.id) {
            Some(existing) => {
                *existing = applicant.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("applicant {}", applicant.id))),
        }
    }

    async fn remove_applicant(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.applicants.remove(&id).is_some();
        if removed {
            tables.applications.retain(|(_, applicant)| *applicant != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.jobs.contains_key(&job_id) {
            return Err(StoreError::NotFound(format!("job {}", job_id)));
        }
        if !tables.applicants.contains_key(&applicant_id) {
            return Err(StoreError::NotFound(format!("applicant {}", applicant_id)));
        }
        Ok(tables.applications.insert((job_id, applicant_id)))
    }

    async fn remove_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.applications.remove(&(job_id, applicant_id)))
    }

    async fn applicants_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Applicant>> {
        let tables = self.tables.read().await;
        let mut applicants: Vec<Applicant> = tables
            .applications
            .range((job_id, Uuid::nil())..=(job_id, Uuid::from_u128(u128::MAX)))
            .filter_map(|(_, applicant_id)| tables.applicants.get(applicant_id).cloned())
            .collect();
        by_name(&mut applicants);
        Ok(applicants)
    }

    async fn jobs_for_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<Job> = tables
            .applications
            .iter()
            .filter(|(_, applicant)| *applicant == applicant_id)
            .filter_map(|(job_id, _)| tables.jobs.get(job_id).cloned())
            .collect();
        by_title(&mut jobs);
        Ok(jobs)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let key = user.email.to_lowercase();
        if tables.users.contains_key(&key) {
            return Err(StoreError::Conflict(format!("user {}", user.email)));
        }
        tables.users.insert(key, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&email.to_lowercase()).cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
