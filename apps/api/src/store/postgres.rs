use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::{Page, RecordStore};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationCreate};
use crate::models::company::{Company, CompanyCreate};
use crate::models::job::{JobPosting, JobPostingCreate};

/// Postgres error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a foreign key violation to `on_violation`; other errors pass through.
fn foreign_key_violation_as(
    err: sqlx::Error,
    on_violation: impl FnOnce() -> AppError,
) -> AppError {
    match err {
        sqlx::Error::Database(e) if e.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            on_violation()
        }
        other => other.into(),
    }
}

fn company_missing(company_id: i64) -> AppError {
    AppError::NotFound(format!("Company {company_id} not found"))
}

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create_company(&self, input: &CompanyCreate) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, industry, url, headcount, country, state, city)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.industry)
        .bind(&input.url)
        .bind(input.headcount)
        .bind(&input.country)
        .bind(&input.state)
        .bind(&input.city)
        .fetch_one(&self.pool)
        .await?;

        info!("Created company {} ({})", company.id, company.name);
        Ok(company)
    }

    async fn list_companies(&self, page: Page) -> Result<Vec<Company>, AppError> {
        let page = page.normalized();
        Ok(sqlx::query_as::<_, Company>(
            "SELECT * FROM companies ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>, AppError> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save_company(&self, company: &Company) -> Result<Option<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, industry = $3, url = $4, headcount = $5,
                country = $6, state = $7, city = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.industry)
        .bind(&company.url)
        .bind(company.headcount)
        .bind(&company.country)
        .bind(&company.state)
        .bind(&company.city)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_company(&self, id: i64) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                foreign_key_violation_as(e, || {
                    AppError::Conflict(format!("Company {id} still has job postings"))
                })
            })?;
        Ok(done.rows_affected() > 0)
    }

    async fn create_job(&self, input: &JobPostingCreate) -> Result<JobPosting, AppError> {
        let job = sqlx::query_as::<_, JobPosting>(
            r#"
            INSERT INTO job_postings
                (title, company_id, compensation_min, compensation_max, location_type,
                 employment_type, is_active, created_at, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(input.company_id)
        .bind(input.compensation_min)
        .bind(input.compensation_max)
        .bind(input.location_type)
        .bind(input.employment_type)
        .bind(input.is_active)
        .bind(&input.created_at)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| foreign_key_violation_as(e, || company_missing(input.company_id)))?;

        info!("Created job posting {} for company {}", job.id, job.company_id);
        Ok(job)
    }

    async fn list_jobs(&self, page: Page) -> Result<Vec<JobPosting>, AppError> {
        let page = page.normalized();
        Ok(sqlx::query_as::<_, JobPosting>(
            "SELECT * FROM job_postings ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_job(&self, id: i64) -> Result<Option<JobPosting>, AppError> {
        Ok(
            sqlx::query_as::<_, JobPosting>("SELECT * FROM job_postings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save_job(&self, job: &JobPosting) -> Result<Option<JobPosting>, AppError> {
        Ok(sqlx::query_as::<_, JobPosting>(
            r#"
            UPDATE job_postings
            SET title = $2, company_id = $3, compensation_min = $4, compensation_max = $5,
                location_type = $6, employment_type = $7, is_active = $8,
                created_at = $9, description = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(job.company_id)
        .bind(job.compensation_min)
        .bind(job.compensation_max)
        .bind(job.location_type)
        .bind(job.employment_type)
        .bind(job.is_active)
        .bind(&job.created_at)
        .bind(&job.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| foreign_key_violation_as(e, || company_missing(job.company_id)))?)
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn set_job_description(
        &self,
        id: i64,
        description: &str,
    ) -> Result<Option<JobPosting>, AppError> {
        Ok(sqlx::query_as::<_, JobPosting>(
            "UPDATE job_postings SET description = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_application(
        &self,
        job_id: i64,
        input: &ApplicationCreate,
    ) -> Result<Application, AppError> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (job_id, candidate_name, candidate_email, resume_url, cover_letter)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(input.candidate_name.trim())
        .bind(input.candidate_email.trim())
        .bind(&input.resume_url)
        .bind(&input.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            foreign_key_violation_as(e, || {
                AppError::NotFound(format!("Job posting {job_id} not found"))
            })
        })?;

        info!("Recorded application {} for job {job_id}", application.id);
        Ok(application)
    }

    async fn list_applications(&self, job_id: i64) -> Result<Vec<Application>, AppError> {
        Ok(sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY submitted_at, id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
