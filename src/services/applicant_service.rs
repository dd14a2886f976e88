use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::database::models::Applicant;
use crate::store::Store;
use crate::validation::ValidationErrors;

use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantChanges {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub job_preferences: Option<String>,
}

impl ApplicantChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none() && self.job_preferences.is_none()
    }

    fn into_applicant(self, id: Uuid) -> Result<Applicant, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let applicant = Applicant {
            id,
            name: errors.require("name", self.name).unwrap_or_default(),
            contact: errors.require("contact", self.contact).unwrap_or_default(),
            job_preferences: errors.require("job_preferences", self.job_preferences).unwrap_or_default(),
        };
        if let Err(invalid) = applicant.validate() {
            errors.merge(invalid);
        }
        errors.into_result().map(|_| applicant)
    }

    fn apply_to(self, applicant: &mut Applicant) {
        if let Some(name) = self.name {
            applicant.name = name;
        }
        if let Some(contact) = self.contact {
            applicant.contact = contact;
        }
        if let Some(job_preferences) = self.job_preferences {
            applicant.job_preferences = job_preferences;
        }
    }
}

#[derive(Clone)]
pub struct ApplicantService {
    store: Arc<dyn Store>,
}

impl ApplicantService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, changes: ApplicantChanges) -> ServiceResult<Applicant> {
        let applicant = changes.into_applicant(Uuid::new_v4())?;
        self.store.insert_applicant(&applicant).await?;
        info!("Created applicant {} ({})", applicant.id, applicant.name);
        Ok(applicant)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Applicant> {
        self.store
            .find_applicant(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Applicant", id))
    }

    pub async fn list(&self) -> ServiceResult<Vec<Applicant>> {
        Ok(self.store.list_applicants().await?)
    }

    pub async fn update(&self, id: Uuid, changes: ApplicantChanges) -> ServiceResult<Applicant> {
        let mut applicant = self.get(id).await?;
        if changes.is_empty() {
            return Err(ServiceError::EmptyChanges);
        }

        changes.apply_to(&mut applicant);
        applicant.validate()?;
        self.store.update_applicant(&applicant).await?;
        info!("Updated applicant {}", id);
        Ok(applicant)
    }

    /// Deletes the applicant and withdraws all of their applications
    pub async fn delete(&self, id: Uuid) -> ServiceResult<Applicant> {
        let applicant = self.get(id).await?;
        if !self.store.remove_applicant(id).await? {
            return Err(ServiceError::not_found("Applicant", id));
        }
        info!("Deleted applicant {}", id);
        Ok(applicant)
    }
}
