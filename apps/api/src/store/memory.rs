//! In-memory `RecordStore` for tests. Mirrors the Postgres constraints that
//! handlers rely on: generated ids, parent rows required on insert and update,
//! restricted company deletes, cascading job deletes.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{Page, RecordStore};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationCreate, ApplicationStatus};
use crate::models::company::{Company, CompanyCreate};
use crate::models::job::{JobPosting, JobPostingCreate};

#[derive(Default)]
struct Tables {
    companies: BTreeMap<i64, Company>,
    jobs: BTreeMap<i64, JobPosting>,
    applications: BTreeMap<i64, Application>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_company(&self, company_id: i64) -> Result<(), AppError> {
        if self.companies.contains_key(&company_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Company {company_id} not found")))
        }
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a company with a fixed id.
    pub fn insert_company(&self, company: Company) {
        let mut t = self.tables.lock().unwrap();
        t.next_id = t.next_id.max(company.id);
        t.companies.insert(company.id, company);
    }

    /// Seeds a job posting with a fixed id, bypassing the company check.
    pub fn insert_job(&self, job: JobPosting) {
        let mut t = self.tables.lock().unwrap();
        t.next_id = t.next_id.max(job.id);
        t.jobs.insert(job.id, job);
    }

    pub fn job(&self, id: i64) -> Option<JobPosting> {
        self.tables.lock().unwrap().jobs.get(&id).cloned()
    }
}

fn paged<T: Clone>(map: &BTreeMap<i64, T>, page: Page) -> Vec<T> {
    let page = page.normalized();
    map.values()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_company(&self, input: &CompanyCreate) -> Result<Company, AppError> {
        let mut t = self.tables.lock().unwrap();
        let company = Company {
            id: t.next_id(),
            name: input.name.clone(),
            industry: input.industry.clone(),
            url: input.url.clone(),
            headcount: input.headcount,
            country: input.country.clone(),
            state: input.state.clone(),
            city: input.city.clone(),
        };
        t.companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn list_companies(&self, page: Page) -> Result<Vec<Company>, AppError> {
        Ok(paged(&self.tables.lock().unwrap().companies, page))
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>, AppError> {
        Ok(self.tables.lock().unwrap().companies.get(&id).cloned())
    }

    async fn save_company(&self, company: &Company) -> Result<Option<Company>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.companies.get_mut(&company.id).map(|slot| {
            *slot = company.clone();
            slot.clone()
        }))
    }

    async fn delete_company(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.jobs.values().any(|j| j.company_id == id) {
            return Err(AppError::Conflict(format!(
                "Company {id} still has job postings"
            )));
        }
        Ok(t.companies.remove(&id).is_some())
    }

    async fn create_job(&self, input: &JobPostingCreate) -> Result<JobPosting, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.require_company(input.company_id)?;
        let job = JobPosting {
            id: t.next_id(),
            title: input.title.clone(),
            company_id: input.company_id,
            compensation_min: input.compensation_min,
            compensation_max: input.compensation_max,
            location_type: input.location_type,
            employment_type: input.employment_type,
            is_active: input.is_active,
            created_at: input.created_at.clone(),
            description: input.description.clone(),
        };
        t.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn list_jobs(&self, page: Page) -> Result<Vec<JobPosting>, AppError> {
        Ok(paged(&self.tables.lock().unwrap().jobs, page))
    }

    async fn get_job(&self, id: i64) -> Result<Option<JobPosting>, AppError> {
        Ok(self.job(id))
    }

    async fn save_job(&self, job: &JobPosting) -> Result<Option<JobPosting>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.jobs.contains_key(&job.id) {
            t.require_company(job.company_id)?;
        }
        Ok(t.jobs.get_mut(&job.id).map(|slot| {
            *slot = job.clone();
            slot.clone()
        }))
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let removed = t.jobs.remove(&id).is_some();
        t.applications.retain(|_, a| a.job_id != id);
        Ok(removed)
    }

    async fn set_job_description(
        &self,
        id: i64,
        description: &str,
    ) -> Result<Option<JobPosting>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.jobs.get_mut(&id).map(|job| {
            job.description = Some(description.to_string());
            job.clone()
        }))
    }

    async fn create_application(
        &self,
        job_id: i64,
        input: &ApplicationCreate,
    ) -> Result<Application, AppError> {
        let mut t = self.tables.lock().unwrap();
        if !t.jobs.contains_key(&job_id) {
            return Err(AppError::NotFound(format!("Job posting {job_id} not found")));
        }
        let application = Application {
            id: t.next_id(),
            job_id,
            candidate_name: input.candidate_name.trim().to_string(),
            candidate_email: input.candidate_email.trim().to_string(),
            resume_url: input.resume_url.clone(),
            cover_letter: input.cover_letter.clone(),
            status: ApplicationStatus::Submitted,
            submitted_at: Utc::now(),
        };
        t.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn list_applications(&self, job_id: i64) -> Result<Vec<Application>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }
}
