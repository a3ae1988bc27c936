// Job Lifecycle Engine - status, deadline and featured rules for every entry point

pub mod create;
pub mod search;


pub use create::{
    validate_request, CreateJobRequest, ExperienceInput, LocationInput, SalaryInput,
    UpdateJobRequest,
};
pub use search::SearchCriteria;

use crate::application::constants::DEFAULT_FEATURED_LIMIT;
use crate::domain::{
    is_visible, Caller, Company, Job, JobFilter, JobId, JobQuery, JobStatus, Page, PageRequest,
    Principal, Role, ValidationErrors,
};
use crate::error::{AppError, Result};
use crate::port::{CompanyRepository, IdProvider, JobRepository, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Job counts for the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total: i64,
    pub open: i64,
    pub closed: i64,
    pub on_hold: i64,
    pub featured: i64,
    /// Open jobs the public can currently see
    pub visible: i64,
    /// Open jobs past their deadline, waiting for the expiry sweep
    pub awaiting_expiry: i64,
}

/// Owns job status transitions, deadline expiry and the visibility contract
pub struct JobLifecycleEngine {
    job_repo: Arc<dyn JobRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobLifecycleEngine {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_repo,
            company_repo,
            id_provider,
            time_provider,
        }
    }

    pub fn now_millis(&self) -> i64 {
        self.time_provider.now_millis()
    }

    /// See [`crate::domain::is_visible`]
    pub fn is_visible(&self, job: &Job, now_millis: i64) -> bool {
        is_visible(job, now_millis)
    }

    /// Close every Open job whose deadline passed before `now_millis`
    ///
    /// Idempotent; never deletes and never touches `featured`.
    pub async fn expire_overdue_jobs(&self, now_millis: i64) -> Result<u64> {
        let closed = self.job_repo.close_overdue(now_millis).await?;
        if closed > 0 {
            info!(closed_jobs = closed, now = now_millis, "Closed overdue jobs");
        }
        Ok(closed)
    }

    /// Flip the featured flag (admin only, status is not consulted)
    pub async fn toggle_featured(&self, caller: &Caller, job_id: &JobId) -> Result<bool> {
        let admin = caller.require_admin("toggle featured jobs")?;
        let now = self.now_millis();

        let featured = self
            .job_repo
            .toggle_featured(job_id, now)
            .await?
            .ok_or_else(|| job_not_found(job_id))?;

        info!(job_id = %job_id, featured, admin = %admin.id, "Toggled featured flag");
        Ok(featured)
    }

    /// Create an Open, non-featured job
    pub async fn create(&self, caller: &Caller, req: CreateJobRequest) -> Result<Job> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "post jobs")?;

        let company = self.lookup_company(req.company_id.as_deref()).await?;
        let mut errors = ValidationErrors::new();
        let draft = create::collect_draft(&req, &mut errors);
        if req.company_id.is_some() && company.is_none() {
            errors.add("company_id", "does not match any company");
        }
        let (draft, company) = match (draft, company) {
            (Some(draft), Some(company)) if errors.is_empty() => (draft, company),
            _ => {
                warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Rejected job create");
                return Err(AppError::Validation(errors));
            }
        };

        ensure_company_access(principal, &company)?;

        let job = Job::new(
            self.id_provider.generate_id(),
            self.now_millis(),
            principal.id.clone(),
            draft,
        );
        self.job_repo.insert(&job).await?;

        info!(
            job_id = %job.id,
            company_id = %job.company_id,
            posted_by = %job.posted_by,
            deadline = ?job.application_deadline,
            "Job created"
        );
        Ok(job)
    }

    /// Edit posting content (owner or admin); status and featured are not editable here
    pub async fn update(
        &self,
        caller: &Caller,
        job_id: &JobId,
        req: UpdateJobRequest,
    ) -> Result<Job> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "edit jobs")?;
        let mut job = self.find_job(job_id).await?;
        ensure_job_access(principal, &job)?;

        let moving_company = req
            .company_id
            .as_deref()
            .is_some_and(|id| id.trim() != job.company_id);
        let merged = req.merge_onto(&job);

        let company = if moving_company {
            self.lookup_company(merged.company_id.as_deref()).await?
        } else {
            None
        };

        let mut errors = ValidationErrors::new();
        let draft = create::collect_draft(&merged, &mut errors);
        if moving_company && company.is_none() {
            errors.add("company_id", "does not match any company");
        }
        let draft = match draft {
            Some(draft) if errors.is_empty() => draft,
            _ => return Err(AppError::Validation(errors)),
        };
        if let Some(company) = &company {
            ensure_company_access(principal, company)?;
        }

        job.apply_draft(draft, self.now_millis());
        self.job_repo.update(&job).await?;

        info!(job_id = %job.id, by = %principal.id, "Job updated");
        Ok(job)
    }

    /// Explicit Open -> Closed (owner or admin)
    pub async fn close(&self, caller: &Caller, job_id: &JobId) -> Result<Job> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "close jobs")?;
        let mut job = self.find_job(job_id).await?;
        ensure_job_access(principal, &job)?;

        job.close(self.now_millis())?;
        self.job_repo.update(&job).await?;

        info!(job_id = %job.id, by = %principal.id, "Job closed");
        Ok(job)
    }

    /// Hard delete (poster or admin); applications referencing the job are kept
    pub async fn delete(&self, caller: &Caller, job_id: &JobId) -> Result<()> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "delete jobs")?;
        let job = self.find_job(job_id).await?;
        ensure_job_access(principal, &job)?;

        if !self.job_repo.delete(job_id).await? {
            return Err(job_not_found(job_id));
        }

        info!(job_id = %job_id, by = %principal.id, "Job deleted");
        Ok(())
    }

    /// Public search: visible jobs only
    pub async fn search_public(&self, criteria: SearchCriteria) -> Result<Page<Job>> {
        let query = criteria.into_query(JobFilter::public(self.now_millis()))?;
        self.page(query).await
    }

    /// Featured jobs the public may see (`featured AND visible`)
    pub async fn featured_public(&self, limit: Option<u32>) -> Result<Vec<Job>> {
        let mut filter = JobFilter::public(self.now_millis());
        filter.featured = Some(true);
        let mut query = JobQuery::new(filter);
        query.page = PageRequest::new(Some(1), Some(limit.unwrap_or(DEFAULT_FEATURED_LIMIT)));
        self.job_repo.find(&query).await
    }

    /// Visible jobs of one company
    pub async fn company_jobs_public(
        &self,
        company_id: &str,
        criteria: SearchCriteria,
    ) -> Result<Page<Job>> {
        if self.lookup_company(Some(company_id)).await?.is_none() {
            return Err(AppError::NotFound(format!("Company {} not found", company_id)));
        }
        let mut base = JobFilter::public(self.now_millis());
        base.company_id = Some(company_id.to_string());
        self.page(criteria.into_query(base)?).await
    }

    /// Single job for the public; counts a view
    pub async fn get_public(&self, job_id: &JobId) -> Result<Job> {
        let mut job = self.find_job(job_id).await?;
        if !is_visible(&job, self.now_millis()) {
            return Err(job_not_found(job_id));
        }
        self.job_repo.increment_views(job_id).await?;
        job.views += 1;
        Ok(job)
    }

    /// Admin listing: all jobs regardless of visibility
    pub async fn list_admin(&self, caller: &Caller, criteria: SearchCriteria) -> Result<Page<Job>> {
        caller.require_admin("list all jobs")?;
        let query = criteria.into_query(JobFilter::all())?;
        self.page(query).await
    }

    /// Admin single read: stored state, no view counted
    pub async fn get_admin(&self, caller: &Caller, job_id: &JobId) -> Result<Job> {
        caller.require_admin("inspect jobs")?;
        self.find_job(job_id).await
    }

    pub async fn stats(&self, caller: &Caller) -> Result<JobStats> {
        caller.require_admin("view job statistics")?;

        let total = self.job_repo.count(&JobFilter::all()).await?;
        let open = self.count_status(JobStatus::Open).await?;
        let closed = self.count_status(JobStatus::Closed).await?;
        let on_hold = self.count_status(JobStatus::OnHold).await?;

        let mut featured_filter = JobFilter::all();
        featured_filter.featured = Some(true);
        let featured = self.job_repo.count(&featured_filter).await?;

        let visible = self
            .job_repo
            .count(&JobFilter::public(self.now_millis()))
            .await?;

        Ok(JobStats {
            total,
            open,
            closed,
            on_hold,
            featured,
            visible,
            awaiting_expiry: open - visible,
        })
    }

    async fn count_status(&self, status: JobStatus) -> Result<i64> {
        let mut filter = JobFilter::all();
        filter.status = Some(status);
        self.job_repo.count(&filter).await
    }

    async fn page(&self, query: JobQuery) -> Result<Page<Job>> {
        let total = self.job_repo.count(&query.filter).await?;
        let items = self.job_repo.find(&query).await?;
        Ok(Page::new(items, total, query.page))
    }

    async fn find_job(&self, job_id: &JobId) -> Result<Job> {
        self.job_repo
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| job_not_found(job_id))
    }

    async fn lookup_company(&self, company_id: Option<&str>) -> Result<Option<Company>> {
        match company_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self.company_repo.find_by_id(&id.to_string()).await,
            None => Ok(None),
        }
    }
}

fn job_not_found(job_id: &str) -> AppError {
    AppError::NotFound(format!("Job {} not found", job_id))
}

fn ensure_job_access(principal: &Principal, job: &Job) -> Result<()> {
    if principal.can_manage(job) {
        Ok(())
    } else {
        warn!(job_id = %job.id, user = %principal.id, "Rejected job mutation by non-owner");
        Err(AppError::Forbidden(format!(
            "job {} belongs to another employer",
            job.id
        )))
    }
}

fn ensure_company_access(principal: &Principal, company: &Company) -> Result<()> {
    if principal.is_admin() || company.owner_id == principal.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "company {} belongs to another employer",
            company.id
        )))
    }
}
