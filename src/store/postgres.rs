use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{Applicant, Company, Job, User};
use crate::filter::JobQuery;

use super::{
    ApplicantStore, ApplicationStore, CompanyStore, JobStore, Store, StoreError, StoreResult,
    UserStore,
};

/// Tables created by `PgStore::bootstrap`. The job_applicants primary key is
/// the authoritative duplicate-application guard.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS companies (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        location VARCHAR(255) NOT NULL,
        contact VARCHAR(255) NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL,
        required_skills TEXT NOT NULL,
        experience VARCHAR(255) NOT NULL,
        company_id UUID NOT NULL REFERENCES companies (id) ON DELETE CASCADE
    )"#,
    "CREATE INDEX IF NOT EXISTS jobs_company_id_idx ON jobs (company_id)",
    r#"CREATE TABLE IF NOT EXISTS applicants (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        contact VARCHAR(255) NOT NULL,
        job_preferences TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_applicants (
        job_id UUID NOT NULL REFERENCES jobs (id) ON DELETE CASCADE,
        applicant_id UUID NOT NULL REFERENCES applicants (id) ON DELETE CASCADE,
        PRIMARY KEY (job_id, applicant_id)
    )"#,
    "CREATE INDEX IF NOT EXISTS job_applicants_applicant_id_idx ON job_applicants (applicant_id)",
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email VARCHAR(180) NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx ON users (lower(email))",
];

const JOB_COLUMNS: &str = "j.id, j.title, j.description, j.required_skills, j.experience, j.company_id";
const JOB_ORDER: &str = "ORDER BY j.title COLLATE \"C\" ASC, j.id ASC";
const APPLICANT_ORDER: &str = "ORDER BY a.name COLLATE \"C\" ASC, a.id ASC";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the job board tables if they do not exist yet
    pub async fn bootstrap(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Job board schema ready ({} statements)", SCHEMA.len());
        Ok(())
    }
}

fn expect_one(rows_affected: u64, what: &str, id: Uuid) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound(format!("{} {}", what, id)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn insert_company(&self, company: &Company) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO companies (id, name, description, location, contact) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.location)
        .bind(&company.contact)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, description, location, contact FROM companies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT id, name, description, location, contact FROM companies ORDER BY name COLLATE \"C\" ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn update_company(&self, company: &Company) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE companies SET name = $2, description = $3, location = $4, contact = $5 WHERE id = $1",
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.location)
        .bind(&company.contact)
        .execute(&self.pool)
        .await?;
        expect_one(result.rows_affected(), "company", company.id)
    }

    async fn remove_company(&self, id: Uuid) -> StoreResult<bool> {
        // jobs and their applications go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO jobs (id, title, description, required_skills, experience, company_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.experience)
        .bind(job.company_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs j WHERE j.id = $1", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let sql = query.to_sql();
        tracing::debug!("Job search: {} {:?}", sql.query, sql.params);

        let mut q = sqlx::query_as::<_, Job>(&sql.query);
        for param in sql.params.iter() {
            q = q.bind(param);
        }
        let jobs = q.fetch_all(&self.pool).await?;
        Ok(jobs)
    }

    async fn jobs_for_company(&self, company_id: Uuid) -> StoreResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs j WHERE j.company_id = $1 {}",
            JOB_COLUMNS, JOB_ORDER
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn update_job(&self, job: &Job) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE jobs SET title = $2, description = $3, required_skills = $4, experience = $5, company_id = $6 \
             WHERE id = $1",
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.experience)
        .bind(job.company_id)
        .execute(&self.pool)
        .await?;
        expect_one(result.rows_affected(), "job", job.id)
    }

    async fn remove_job(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicantStore for PgStore {
    async fn insert_applicant(&self, applicant: &Applicant) -> StoreResult<()> {
        sqlx::query("INSERT INTO applicants (id, name, contact, job_preferences) VALUES ($1, $2, $3, $4)")
            .bind(applicant.id)
            .bind(&applicant.name)
            .bind(&applicant.contact)
            .bind(&applicant.job_preferences)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_applicant(&self, id: Uuid) -> StoreResult<Option<Applicant>> {
        let applicant = sqlx::query_as::<_, Applicant>(
            "SELECT id, name, contact, job_preferences FROM applicants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(applicant)
    }

    async fn list_applicants(&self) -> StoreResult<Vec<Applicant>> {
        let applicants = sqlx::query_as::<_, Applicant>(&format!(
            "SELECT a.id, a.name, a.contact, a.job_preferences FROM applicants a {}",
            APPLICANT_ORDER
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(applicants)
    }

    async fn update_applicant(&self, applicant: &Applicant) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE applicants SET name = $2, contact = $3, job_preferences = $4 WHERE id = $1",
        )
        .bind(applicant.id)
        .bind(&applicant.name)
        .bind(&applicant.contact)
        .bind(&applicant.job_preferences)
        .execute(&self.pool)
        .await?;
        expect_one(result.rows_affected(), "applicant", applicant.id)
    }

    async fn remove_applicant(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO job_applicants (job_id, applicant_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(job_id)
        .bind(applicant_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_application(&self, job_id: Uuid, applicant_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM job_applicants WHERE job_id = $1 AND applicant_id = $2")
            .bind(job_id)
            .bind(applicant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn applicants_for_job(&self, job_id: Uuid) -> StoreResult<Vec<Applicant>> {
        let applicants = sqlx::query_as::<_, Applicant>(&format!(
            "SELECT a.id, a.name, a.contact, a.job_preferences FROM applicants a \
             INNER JOIN job_applicants ja ON ja.applicant_id = a.id WHERE ja.job_id = $1 {}",
            APPLICANT_ORDER
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applicants)
    }

    async fn jobs_for_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs j INNER JOIN job_applicants ja ON ja.job_id = j.id WHERE ja.applicant_id = $1 {}",
            JOB_COLUMNS, JOB_ORDER
        ))
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)")
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
