use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::config::SearchConfig;
use crate::database::models::Job;
use crate::filter::{JobFilter, JobQuery, Page};
use crate::store::Store;
use crate::validation::{parse_id, ValidationErrors};

use super::{ServiceError, ServiceResult};

/// Partial job payload. `company_id` arrives as text and is parsed here so a
/// malformed id is reported on its field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<String>,
    pub experience: Option<String>,
    pub company_id: Option<String>,
}

impl JobChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.required_skills.is_none()
            && self.experience.is_none()
            && self.company_id.is_none()
    }

    fn company_id(&self) -> Result<Option<Uuid>, ValidationErrors> {
        self.company_id.as_deref().map(|raw| parse_id("company_id", raw)).transpose()
    }

    fn into_job(self, id: Uuid, company_id: Uuid) -> Job {
        Job {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            required_skills: self.required_skills.unwrap_or_default(),
            experience: self.experience.unwrap_or_default(),
            company_id,
        }
    }

    fn apply_to(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title;
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(required_skills) = self.required_skills {
            job.required_skills = required_skills;
        }
        if let Some(experience) = self.experience {
            job.experience = experience;
        }
    }
}

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
    search: SearchConfig,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>, search: SearchConfig) -> Self {
        Self { store, search }
    }

    pub async fn create(&self, changes: JobChanges) -> ServiceResult<Job> {
        let mut errors = ValidationErrors::new();
        errors.require("title", changes.title.as_ref());
        errors.require("description", changes.description.as_ref());
        errors.require("required_skills", changes.required_skills.as_ref());
        errors.require("experience", changes.experience.as_ref());
        errors.require("company_id", changes.company_id.as_ref());

        let company_id = match changes.company_id() {
            Ok(id) => id,
            Err(invalid) => {
                errors.merge(invalid);
                None
            }
        };

        let job = changes.into_job(Uuid::new_v4(), company_id.unwrap_or_default());
        if let Err(invalid) = job.validate() {
            errors.merge(invalid);
        }
        errors.into_result()?;

        if self.store.find_company(job.company_id).await?.is_none() {
            return Err(ServiceError::not_found("Company", job.company_id));
        }

        self.store.insert_job(&job).await?;
        info!("Created job {} ({}) for company {}", job.id, job.title, job.company_id);
        Ok(job)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Job> {
        self.store
            .find_job(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job", id))
    }

    /// Filtered job search, ordered by title then id
    pub async fn search(&self, filter: &JobFilter, page: Page) -> ServiceResult<Vec<Job>> {
        let query = JobQuery::from_filter(filter).page(page, self.search.max_limit)?;
        if self.search.debug_logging {
            debug!("Job search filter={:?} page={:?} sql={}", filter, page, query.to_sql().query);
        }

        let jobs = self.store.search_jobs(&query).await?;
        debug!("Job search matched {} jobs", jobs.len());
        Ok(jobs)
    }

    pub async fn update(&self, id: Uuid, changes: JobChanges) -> ServiceResult<Job> {
        let mut job = self.get(id).await?;
        if changes.is_empty() {
            return Err(ServiceError::EmptyChanges);
        }

        // A new company is checked before any field is touched
        if let Some(company_id) = changes.company_id()? {
            if self.store.find_company(company_id).await?.is_none() {
                return Err(ServiceError::not_found("Company", company_id));
            }
            job.company_id = company_id;
        }

        changes.apply_to(&mut job);
        job.validate()?;
        self.store.update_job(&job).await?;
        info!("Updated job {}", id);
        Ok(job)
    }

    /// Deletes the job and its applications, returning the removed job
    pub async fn delete(&self, id: Uuid) -> ServiceResult<Job> {
        let job = self.get(id).await?;
        if !self.store.remove_job(id).await? {
            return Err(ServiceError::not_found("Job", id));
        }
        info!("Deleted job {}", id);
        Ok(job)
    }
}
