//! Persistence seam for companies, job postings and applications.
//!
//! Handlers and the description flow depend on `RecordStore`, never on a pool.
//! `AppState` holds an `Arc<dyn RecordStore>`; production wires `PgRecordStore`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationCreate};
use crate::models::company::{Company, CompanyCreate};
use crate::models::job::{JobPosting, JobPostingCreate};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRecordStore;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 100;

/// Offset/limit paging taken from the query string.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Clamps to `skip >= 0` and `0 <= limit <= 100`.
    pub fn normalized(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(0, MAX_LIMIT),
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_company(&self, input: &CompanyCreate) -> Result<Company, AppError>;
    async fn list_companies(&self, page: Page) -> Result<Vec<Company>, AppError>;
    async fn get_company(&self, id: i64) -> Result<Option<Company>, AppError>;
    /// Overwrites every column of an existing company. `None` if it no longer exists.
    async fn save_company(&self, company: &Company) -> Result<Option<Company>, AppError>;
    /// `Ok(false)` if absent; `Conflict` while job postings still reference it.
    async fn delete_company(&self, id: i64) -> Result<bool, AppError>;

    /// `NotFound` if the company is gone by the time the row is written.
    async fn create_job(&self, input: &JobPostingCreate) -> Result<JobPosting, AppError>;
    async fn list_jobs(&self, page: Page) -> Result<Vec<JobPosting>, AppError>;
    async fn get_job(&self, id: i64) -> Result<Option<JobPosting>, AppError>;
    /// Overwrites every column of an existing job posting. `None` if it no longer
    /// exists, `NotFound` if its company does not.
    async fn save_job(&self, job: &JobPosting) -> Result<Option<JobPosting>, AppError>;
    /// Deletes the posting and its applications.
    async fn delete_job(&self, id: i64) -> Result<bool, AppError>;
    /// Writes only the description column.
    async fn set_job_description(
        &self,
        id: i64,
        description: &str,
    ) -> Result<Option<JobPosting>, AppError>;

    /// `NotFound` if the job posting is gone by the time the row is written.
    async fn create_application(
        &self,
        job_id: i64,
        input: &ApplicationCreate,
    ) -> Result<Application, AppError>;
    async fn list_applications(&self, job_id: i64) -> Result<Vec<Application>, AppError>;
}
