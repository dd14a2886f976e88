use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::database::models::{Company, Job};
use crate::store::Store;
use crate::validation::ValidationErrors;

use super::{ServiceError, ServiceResult};

/// Partial company payload. Create requires every field, update applies the
/// present ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

impl CompanyChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.location.is_none() && self.contact.is_none()
    }

    fn into_company(self, id: Uuid) -> Result<Company, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let company = Company {
            id,
            name: errors.require("name", self.name).unwrap_or_default(),
            description: errors.require("description", self.description).unwrap_or_default(),
            location: errors.require("location", self.location).unwrap_or_default(),
            contact: errors.require("contact", self.contact).unwrap_or_default(),
        };
        if let Err(invalid) = company.validate() {
            errors.merge(invalid);
        }
        errors.into_result().map(|_| company)
    }

    fn apply_to(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(description) = self.description {
            company.description = description;
        }
        if let Some(location) = self.location {
            company.location = location;
        }
        if let Some(contact) = self.contact {
            company.contact = contact;
        }
    }
}

/// A company together with the jobs it owns
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn Store>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, changes: CompanyChanges) -> ServiceResult<Company> {
        let company = changes.into_company(Uuid::new_v4())?;
        self.store.insert_company(&company).await?;
        info!("Created company {} ({})", company.id, company.name);
        Ok(company)
    }

    pub async fn find(&self, id: Uuid) -> ServiceResult<Company> {
        self.store
            .find_company(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Company", id))
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<CompanyDetail> {
        let company = self.find(id).await?;
        let jobs = self.store.jobs_for_company(id).await?;
        Ok(CompanyDetail { company, jobs })
    }

    pub async fn list(&self) -> ServiceResult<Vec<Company>> {
        Ok(self.store.list_companies().await?)
    }

    pub async fn update(&self, id: Uuid, changes: CompanyChanges) -> ServiceResult<Company> {
        let mut company = self.find(id).await?;
        if changes.is_empty() {
            return Err(ServiceError::EmptyChanges);
        }

        changes.apply_to(&mut company);
        company.validate()?;
        self.store.update_company(&company).await?;
        info!("Updated company {}", id);
        Ok(company)
    }

    /// Deletes the company along with its jobs
    pub async fn delete(&self, id: Uuid) -> ServiceResult<Uuid> {
        if !self.store.remove_company(id).await? {
            return Err(ServiceError::not_found("Company", id));
        }
        info!("Deleted company {}", id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn create_reports_missing_and_invalid_fields_together() {
        let ctx = TestContext::new();
        let err = ctx
            .companies
            .create(CompanyChanges {
                name: Some("AB".to_string()),
                description: Some("We build things".to_string()),
                location: None,
                contact: None,
            })
            .await
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error, got {:?}", err);
        };
        assert!(errors.get("name").unwrap().contains("between 3 and 255"));
        assert_eq!(errors.get("location"), Some(crate::validation::REQUIRED));
        assert_eq!(errors.get("contact"), Some(crate::validation::REQUIRED));
        assert!(errors.get("description").is_none());
    }

    #[tokio::test]
    async fn partial_update_keeps_absent_fields() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;

        let updated = ctx
            .companies
            .update(
                company.id,
                CompanyChanges { location: Some("Berlin".to_string()), ..Default::default() },
            )
            .await
            .unwrap();

        assert_eq!(updated.location, "Berlin");
        assert_eq!(updated.name, company.name);
        assert_eq!(updated.contact, company.contact);
        assert_eq!(ctx.companies.find(company.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let err = ctx.companies.update(company.id, CompanyChanges::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::EmptyChanges));
    }

    #[tokio::test]
    async fn get_includes_jobs_and_delete_removes_them() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;

        let detail = ctx.companies.get(company.id).await.unwrap();
        assert_eq!(detail.jobs, vec![job.clone()]);

        ctx.companies.delete(company.id).await.unwrap();
        assert!(matches!(
            ctx.jobs.get(job.id).await,
            Err(ServiceError::NotFound { entity: "Job", .. })
        ));
        assert!(matches!(
            ctx.companies.delete(company.id).await,
            Err(ServiceError::NotFound { entity: "Company", .. })
        ));
    }
}
