//! Applicant to job links.
//!
//! The relation lives in the store as one set of `(job_id, applicant_id)`
//! edges. Both directions are read from that set, so a successful link or
//! unlink is visible from the job and from the applicant at once.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{Applicant, Job};
use crate::filter::JobQuery;
use crate::store::{Store, StoreError};

use super::{ServiceError, ServiceResult};

/// A job together with everyone who applied to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobApplications {
    #[serde(flatten)]
    pub job: Job,
    pub applicants: Vec<Applicant>,
}

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn job(&self, id: Uuid) -> ServiceResult<Job> {
        self.store
            .find_job(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job", id))
    }

    async fn applicant(&self, id: Uuid) -> ServiceResult<Applicant> {
        self.store
            .find_applicant(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Applicant", id))
    }

    /// Record that an applicant applied to a job.
    ///
    /// Fails with `NotFound` for a missing job or applicant and with
    /// `AlreadyApplied` when the edge exists. The scan of the job's applicants
    /// only gives an early answer; the store's atomic insert decides races.
    pub async fn link_applicant_to_job(&self, job_id: Uuid, applicant_id: Uuid) -> ServiceResult<JobApplications> {
        let job = self.job(job_id).await?;
        self.applicant(applicant_id).await?;

        let current = self.store.applicants_for_job(job_id).await?;
        if current.iter().any(|a| a.id == applicant_id) {
            warn!("Applicant {} already applied to job {}", applicant_id, job_id);
            return Err(ServiceError::AlreadyApplied { job_id, applicant_id });
        }

        match self.store.insert_application(job_id, applicant_id).await {
            Ok(true) => {}
            Ok(false) | Err(StoreError::Conflict(_)) => {
                warn!("Lost race linking applicant {} to job {}", applicant_id, job_id);
                return Err(ServiceError::AlreadyApplied { job_id, applicant_id });
            }
            Err(StoreError::NotFound(_)) => {
                // One side was deleted between the lookup and the insert
                self.job(job_id).await?;
                return Err(ServiceError::not_found("Applicant", applicant_id));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Linked applicant {} to job {}", applicant_id, job_id);
        let applicants = self.store.applicants_for_job(job_id).await?;
        Ok(JobApplications { job, applicants })
    }

    /// Remove an application. Removing an absent edge succeeds without change.
    pub async fn unlink_applicant_from_job(&self, job_id: Uuid, applicant_id: Uuid) -> ServiceResult<JobApplications> {
        let job = self.job(job_id).await?;
        self.applicant(applicant_id).await?;

        if self.store.remove_application(job_id, applicant_id).await? {
            info!("Unlinked applicant {} from job {}", applicant_id, job_id);
        }

        let applicants = self.store.applicants_for_job(job_id).await?;
        Ok(JobApplications { job, applicants })
    }

    pub async fn list_applicants_for_job(&self, job_id: Uuid) -> ServiceResult<Vec<Applicant>> {
        self.job(job_id).await?;
        Ok(self.store.applicants_for_job(job_id).await?)
    }

    pub async fn list_jobs_for_applicant(&self, applicant_id: Uuid) -> ServiceResult<Vec<Job>> {
        self.applicant(applicant_id).await?;
        Ok(self.store.jobs_for_applicant(applicant_id).await?)
    }

    /// Every job with its applicants, jobs ordered by title then id
    pub async fn list_applications(&self) -> ServiceResult<Vec<JobApplications>> {
        let jobs = self.store.search_jobs(&JobQuery::new()).await?;
        let lookups = jobs.into_iter().map(|job| async move {
            let applicants = self.store.applicants_for_job(job.id).await?;
            Ok::<_, StoreError>(JobApplications { job, applicants })
        });
        Ok(try_join_all(lookups).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Company, User};
    use crate::filter::{JobFilter, Page};
    use crate::store::{
        ApplicantStore, ApplicationStore, CompanyStore, JobStore, MemoryStore, StoreResult, UserStore,
    };
    use crate::testing::TestContext;
    use async_trait::async_trait;
    use futures::future::join_all;

    /// Memory store whose edge insert reports a fixed outcome, as if another
    /// request had written the edge after the duplicate scan
    struct RacingStore {
        inner: MemoryStore,
        insert: fn() -> StoreResult<bool>,
    }

    #[async_trait]
    impl CompanyStore for RacingStore {
        async fn insert_company(&self, company: &Company) -> StoreResult<()> {
            self.inner.insert_company(company).await
        }
        async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>> {
            self.inner.find_company(id).await
        }
        async fn list_companies(&self) -> StoreResult<Vec<Company>> {
            self.inner.list_companies().await
        }
        async fn update_company(&self, company: &Company) -> StoreResult<()> {
            self.inner.update_company(company).await
        }
        async fn remove_company(&self, id: Uuid) -> StoreResult<bool> {
            self.inner.remove_company(id).await
        }
    }

    #[async_trait]
    impl JobStore for RacingStore {
        async fn insert_job(&self, job: &Job) -> StoreResult<()> {
            self.inner.insert_job(job).await
        }
        async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
            self.inner.find_job(id).await
        }
        async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
            self.inner.search_jobs(query).await
        }
        async fn jobs_for_company(&self, company_id: Uuid) -> StoreResult<Vec<Job>> {
            self.inner.jobs_for_company(company_id).await
        }
        async fn update_job(&self, job: &Job) -> StoreResult<()> {
            self.inner.update_job(job).await
        }
        async fn remove_job(&self, id: Uuid) -> StoreResult<bool> {
            self.inner.remove_job(id).await
        }
    }

    #[async_trait]
    impl ApplicantStore for RacingStore {
        async fn insert_applicant(&self, applicant: &Applicant) -> StoreResult<()> {
            self.inner.insert_applicant(applicant).await
        }
        async fn find_applicant(&self, id: Uuid) -> StoreResult<Option<Applicant>> {
            self.inner.find_applicant(id).await
        }
        async fn list_applicants(&self) -> StoreResult<Vec<Applicant>> {
            self.inner.list_applicants().await
        }
        async fn update_applicant(&self, applicant: &Applicant) -> StoreResult<()> {
            self.inner.update_applicant(applicant).await
        }
        async fn remove_applicant(&self, id: Uuid) -> StoreResult<bool> {
            self.inner.remove_applicant(id).await
        }
    }

    #[async_trait]
    impl ApplicationStore for RacingStore {
        async fn insert_application(&self, _job_id: Uuid, _applicant_id: Uuid) -> StoreResult<bool> {
            (self.insert)()
        }
        async fn remove_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool> {
            self.inner.remove_application(job_id, applicant_id).await
        }
        async fn applicants_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Applicant>> {
            self.inner.applicants_for_job(job_id).await
        }
        async fn jobs_for_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Job>> {
            self.inner.jobs_for_applicant(applicant_id).await
        }
    }

    #[async_trait]
    impl UserStore for RacingStore {
        async fn insert_user(&self, user: &User) -> StoreResult<()> {
            self.inner.insert_user(user).await
        }
        async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
            self.inner.find_user_by_email(email).await
        }
    }

    #[async_trait]
    impl Store for RacingStore {
        fn backend(&self) -> &'static str {
            "racing"
        }
        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    fn ids(jobs: &[Job]) -> Vec<Uuid> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[tokio::test]
    async fn linking_twice_conflicts_with_both_ids() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let applicant = ctx.applicant("Amy Adams").await;

        let linked = ctx.applications.link_applicant_to_job(job.id, applicant.id).await.unwrap();
        assert_eq!(linked.applicants, vec![applicant.clone()]);

        let err = ctx.applications.link_applicant_to_job(job.id, applicant.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::AlreadyApplied { job_id, applicant_id } if job_id == job.id && applicant_id == applicant.id
        ));
        assert_eq!(err.to_string(), "Applicant already exists");
        assert_eq!(ctx.store.application_count().await, 1);
    }

    #[tokio::test]
    async fn link_requires_both_sides() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let applicant = ctx.applicant("Amy Adams").await;
        let missing = Uuid::new_v4();

        assert!(matches!(
            ctx.applications.link_applicant_to_job(missing, applicant.id).await,
            Err(ServiceError::NotFound { entity: "Job", id }) if id == missing
        ));
        assert!(matches!(
            ctx.applications.link_applicant_to_job(job.id, missing).await,
            Err(ServiceError::NotFound { entity: "Applicant", id }) if id == missing
        ));
        assert!(matches!(
            ctx.applications.unlink_applicant_from_job(job.id, missing).await,
            Err(ServiceError::NotFound { entity: "Applicant", .. })
        ));
        assert!(matches!(
            ctx.applications.unlink_applicant_from_job(missing, applicant.id).await,
            Err(ServiceError::NotFound { entity: "Job", .. })
        ));
    }

    #[tokio::test]
    async fn both_views_agree_after_link_and_unlink() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let applicant = ctx.applicant("Amy Adams").await;

        ctx.applications.link_applicant_to_job(job.id, applicant.id).await.unwrap();
        assert_eq!(ctx.applications.list_applicants_for_job(job.id).await.unwrap(), vec![applicant.clone()]);
        assert_eq!(ids(&ctx.applications.list_jobs_for_applicant(applicant.id).await.unwrap()), vec![job.id]);

        let after = ctx.applications.unlink_applicant_from_job(job.id, applicant.id).await.unwrap();
        assert!(after.applicants.is_empty());
        assert!(ctx.applications.list_applicants_for_job(job.id).await.unwrap().is_empty());
        assert!(ctx.applications.list_jobs_for_applicant(applicant.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unlink_without_edge_is_a_no_op() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let amy = ctx.applicant("Amy Adams").await;
        let bob = ctx.applicant("Bob Brown").await;
        ctx.applications.link_applicant_to_job(job.id, bob.id).await.unwrap();

        let result = ctx.applications.unlink_applicant_from_job(job.id, amy.id).await.unwrap();
        assert_eq!(result.applicants, vec![bob]);
        assert_eq!(ctx.store.application_count().await, 1);
    }

    #[tokio::test]
    async fn link_order_does_not_change_the_views() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let backend = ctx.job("Backend Engineer", "3 years", &company).await;
        let frontend = ctx.job("Frontend Engineer", "2 years", &company).await;
        let amy = ctx.applicant("Amy Adams").await;
        let bob = ctx.applicant("Bob Brown").await;

        for (job, applicant) in [(&frontend, &bob), (&backend, &amy), (&backend, &bob)] {
            ctx.applications.link_applicant_to_job(job.id, applicant.id).await.unwrap();
        }

        let bob_jobs = ctx.applications.list_jobs_for_applicant(bob.id).await.unwrap();
        assert_eq!(ids(&bob_jobs), vec![backend.id, frontend.id]);
        let backend_applicants = ctx.applications.list_applicants_for_job(backend.id).await.unwrap();
        assert_eq!(backend_applicants, vec![amy.clone(), bob.clone()]);

        let all = ctx.applications.list_applications().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].job, backend);
        assert_eq!(all[0].applicants, vec![amy, bob.clone()]);
        assert_eq!(all[1].applicants, vec![bob]);
    }

    #[tokio::test]
    async fn concurrent_links_store_one_edge() {
        const N: usize = 16;
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let applicant = ctx.applicant("Amy Adams").await;

        let (job_id, applicant_id) = (job.id, applicant.id);
        let attempts = (0..N).map(|_| {
            let service = ctx.applications.clone();
            tokio::spawn(async move { service.link_applicant_to_job(job_id, applicant_id).await })
        });
        let results: Vec<_> = join_all(attempts).await.into_iter().map(|r| r.unwrap()).collect();

        let linked = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::AlreadyApplied { .. })))
            .count();
        assert_eq!(linked, 1);
        assert_eq!(conflicts, N - 1);
        assert_eq!(ctx.store.application_count().await, 1);
    }

    #[tokio::test]
    async fn lost_insert_race_is_reported_as_already_applied() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let applicant = ctx.applicant("Amy Adams").await;

        let outcomes: [fn() -> StoreResult<bool>; 2] = [
            || Ok(false),
            || Err(StoreError::Conflict("duplicate key value violates unique constraint".to_string())),
        ];
        for insert in outcomes {
            let store = RacingStore { inner: ctx.store.clone(), insert };
            let service = ApplicationService::new(Arc::new(store));

            let err = service.link_applicant_to_job(job.id, applicant.id).await.unwrap_err();
            assert!(matches!(
                err,
                ServiceError::AlreadyApplied { job_id, applicant_id } if job_id == job.id && applicant_id == applicant.id
            ));
        }

        let failing = RacingStore {
            inner: ctx.store.clone(),
            insert: || Err(StoreError::Unavailable("pool timed out".to_string())),
        };
        let err = ApplicationService::new(Arc::new(failing))
            .link_applicant_to_job(job.id, applicant.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable(_))));
        assert_eq!(ctx.store.application_count().await, 0);
    }

    #[tokio::test]
    async fn deleting_either_side_removes_edges_from_both_views() {
        let ctx = TestContext::new();
        let company = ctx.company("Acme", "Remote").await;
        let job = ctx.job("Backend Engineer", "3 years", &company).await;
        let other = ctx.job("Data Engineer", "2 years", &company).await;
        let amy = ctx.applicant("Amy Adams").await;
        let bob = ctx.applicant("Bob Brown").await;
        ctx.applications.link_applicant_to_job(job.id, amy.id).await.unwrap();
        ctx.applications.link_applicant_to_job(other.id, amy.id).await.unwrap();
        ctx.applications.link_applicant_to_job(other.id, bob.id).await.unwrap();

        ctx.jobs.delete(job.id).await.unwrap();
        assert_eq!(ids(&ctx.applications.list_jobs_for_applicant(amy.id).await.unwrap()), vec![other.id]);

        ctx.applicants.delete(amy.id).await.unwrap();
        assert_eq!(ctx.applications.list_applicants_for_job(other.id).await.unwrap(), vec![bob]);
        assert_eq!(ctx.store.application_count().await, 1);
    }

    #[tokio::test]
    async fn search_scenario_and_filter_oracle() {
        let ctx = TestContext::new();
        let acme = ctx.company("Acme", "Remote").await;
        let globex = ctx.company("Globex Corporation", "Onsite Springfield").await;
        let initech = ctx.company("Initech", "Austin, Remote-friendly").await;
        let backend = ctx.job("Backend Engineer", "3 years", &acme).await;
        let jobs = vec![
            backend.clone(),
            ctx.job("Frontend Developer", "2 years", &acme).await,
            ctx.job("backend intern", "0 years", &globex).await,
            ctx.job("Data Engineer", "5 years", &globex).await,
            ctx.job("Support Engineer", "3 YEARS", &initech).await,
            ctx.job("Engineering Manager", "10 years", &initech).await,
        ];
        let company_of = |job: &Job| [&acme, &globex, &initech].into_iter().find(|c| c.id == job.company_id).cloned();

        // The example posting is found by each filter on its own
        let search = &ctx.jobs;
        let by = move |filter: JobFilter| async move { search.search(&filter, Page::default()).await.unwrap() };
        assert!(ids(&by(JobFilter { title: Some("back".into()), ..Default::default() }).await).contains(&backend.id));
        assert!(ids(&by(JobFilter { company_name: Some("acme".into()), ..Default::default() }).await)
            .contains(&backend.id));
        assert!(!ids(&by(JobFilter { location: Some("onsite".into()), ..Default::default() }).await)
            .contains(&backend.id));
        assert_eq!(by(JobFilter::default()).await.len(), jobs.len());

        // Every combination of the four filters against a brute-force scan
        let needles = ["ENGINEER", "acme", "remote", "3 years"];
        for mask in 0u8..16 {
            let pick = |bit: u8| (mask & (1 << bit) != 0).then(|| needles[bit as usize].to_string());
            let filter = JobFilter {
                title: pick(0),
                company_name: pick(1),
                location: pick(2),
                experience: pick(3),
            };

            let contains = |haystack: &str, needle: &Option<String>| {
                needle.as_ref().map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
            };
            let mut expected: Vec<Job> = jobs
                .iter()
                .filter(|job| {
                    let company = company_of(job).unwrap();
                    contains(&job.title, &filter.title)
                        && contains(&company.name, &filter.company_name)
                        && contains(&company.location, &filter.location)
                        && contains(&job.experience, &filter.experience)
                })
                .cloned()
                .collect();
            expected.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

            let found = ctx.jobs.search(&filter, Page::default()).await.unwrap();
            assert_eq!(found, expected, "filter combination {:04b}", mask);
        }
    }
}
