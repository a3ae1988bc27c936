// In-memory port implementations for unit tests

use crate::domain::{
    Application, Company, CompanyId, Job, JobFilter, JobId, JobQuery, JobSort, JobStatus, UserId,
};
use crate::error::{AppError, Result};
use crate::port::{
    ApplicationRepository, CompanyRemovalTransaction, CompanyRepository, JobRepository,
    Transaction, TransactionalCompanyRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Tables {
    jobs: HashMap<JobId, Job>,
    companies: HashMap<CompanyId, Company>,
    applications: Vec<Application>,
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    unavailable: Arc<AtomicBool>,
    counter_broken: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `StoreUnavailable` until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make the `applications_count` bump inside `submit` fail
    pub fn set_counter_broken(&self, broken: bool) {
        self.counter_broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AppError::StoreUnavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn job(&self, id: &str) -> Option<Job> {
        self.tables.lock().unwrap().jobs.get(id).cloned()
    }

    pub fn put_job(&self, job: Job) {
        self.tables.lock().unwrap().jobs.insert(job.id.clone(), job);
    }

    pub fn put_company(&self, company: Company) {
        self.tables
            .lock()
            .unwrap()
            .companies
            .insert(company.id.clone(), company);
    }

    pub fn application_count(&self) -> usize {
        self.tables.lock().unwrap().applications.len()
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn insert(&self, job: &Job) -> Result<()> {
        self.check()?;
        self.put_job(job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>> {
        self.check()?;
        Ok(self.job(id))
    }

    async fn update(&self, job: &Job) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(stored) = tables.jobs.get_mut(&job.id) {
            let (views, applications) = (stored.views, stored.applications_count);
            *stored = job.clone();
            stored.views = views;
            stored.applications_count = applications;
        }
        Ok(())
    }

    async fn delete(&self, id: &JobId) -> Result<bool> {
        self.check()?;
        Ok(self.tables.lock().unwrap().jobs.remove(id).is_some())
    }

    async fn find(&self, query: &JobQuery) -> Result<Vec<Job>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut jobs: Vec<Job> = tables
            .jobs
            .values()
            .filter(|job| query.filter.matches(job))
            .cloned()
            .collect();
        match query.sort {
            JobSort::Newest => jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            JobSort::Oldest => jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            JobSort::SalaryDesc => jobs.sort_by(|a, b| b.salary.max.total_cmp(&a.salary.max)),
        }
        Ok(jobs
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &JobFilter) -> Result<i64> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.values().filter(|job| filter.matches(job)).count() as i64)
    }

    async fn toggle_featured(&self, id: &JobId, now_millis: i64) -> Result<Option<bool>> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .jobs
            .get_mut(id)
            .map(|job| job.toggle_featured(now_millis)))
    }

    async fn close_overdue(&self, now_millis: i64) -> Result<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut closed = 0;
        for job in tables.jobs.values_mut() {
            if job.is_overdue(now_millis) {
                job.status = JobStatus::Closed;
                job.updated_at = now_millis;
                closed += 1;
            }
        }
        Ok(closed)
    }

    async fn increment_views(&self, id: &JobId) -> Result<()> {
        self.check()?;
        if let Some(job) = self.tables.lock().unwrap().jobs.get_mut(id) {
            job.views += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn insert(&self, company: &Company) -> Result<()> {
        self.check()?;
        self.put_company(company.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>> {
        self.check()?;
        Ok(self.tables.lock().unwrap().companies.get(id).cloned())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn submit(&self, application: &Application) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if self.counter_broken.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "applications_count update failed".to_string(),
            ));
        }
        if let Some(job) = tables.jobs.get_mut(&application.job_id) {
            job.applications_count += 1;
        }
        tables.applications.push(application.clone());
        Ok(())
    }

    async fn find_by_job(&self, job_id: &JobId) -> Result<Vec<Application>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .applications
            .iter()
            .filter(|a| &a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn exists(&self, job_id: &JobId, applicant_id: &UserId) -> Result<bool> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .applications
            .iter()
            .any(|a| &a.job_id == job_id && &a.applicant_id == applicant_id))
    }
}

/// Buffers deletes until commit
pub struct MemoryTransaction {
    store: MemoryStore,
    jobs_of: Vec<CompanyId>,
    companies: Vec<CompanyId>,
}

#[async_trait]
impl TransactionalCompanyRepository for MemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn CompanyRemovalTransaction>> {
        self.check()?;
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            jobs_of: Vec::new(),
            companies: Vec::new(),
        }))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.store.check()?;
        let mut tables = self.store.tables.lock().unwrap();
        for company_id in &self.jobs_of {
            tables.jobs.retain(|_, job| &job.company_id != company_id);
        }
        for company_id in &self.companies {
            tables.companies.remove(company_id);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl CompanyRemovalTransaction for MemoryTransaction {
    async fn delete_jobs_by_company(&mut self, company_id: &CompanyId) -> Result<u64> {
        self.store.check()?;
        let count = self
            .store
            .tables
            .lock()
            .unwrap()
            .jobs
            .values()
            .filter(|job| &job.company_id == company_id)
            .count() as u64;
        self.jobs_of.push(company_id.clone());
        Ok(count)
    }

    async fn delete_company(&mut self, company_id: &CompanyId) -> Result<bool> {
        self.store.check()?;
        let exists = self
            .store
            .tables
            .lock()
            .unwrap()
            .companies
            .contains_key(company_id);
        self.companies.push(company_id.clone());
        Ok(exists)
    }
}
