// Application Service - job seekers applying to visible jobs

use crate::domain::{
    is_visible, normalize_resume_path, Application, Caller, JobId, Role, ValidationErrors,
};
use crate::error::{AppError, Result};
use crate::port::{ApplicationRepository, IdProvider, JobRepository, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
}

pub struct ApplicationService {
    job_repo: Arc<dyn JobRepository>,
    application_repo: Arc<dyn ApplicationRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ApplicationService {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        application_repo: Arc<dyn ApplicationRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_repo,
            application_repo,
            id_provider,
            time_provider,
        }
    }

    /// Apply to a job that is visible right now
    ///
    /// Visibility is checked here rather than trusting the stored status,
    /// so an unswept past-deadline job is already closed for applications.
    pub async fn apply(
        &self,
        caller: &Caller,
        job_id: &JobId,
        req: ApplyRequest,
    ) -> Result<Application> {
        let principal = caller.require_role(&[Role::Jobseeker], "apply to jobs")?;
        let now = self.time_provider.now_millis();

        let job = self
            .job_repo
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;
        if !is_visible(&job, now) {
            warn!(job_id = %job_id, status = %job.status, "Rejected application to closed job");
            return Err(AppError::InvalidState(format!(
                "job {} is not accepting applications",
                job_id
            )));
        }

        let resume_path = match req.resume_path.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_resume_path(raw).ok_or_else(|| {
                ValidationErrors::single("resume_path", "is not a valid resume location")
            })?),
        };

        if self
            .application_repo
            .exists(job_id, &principal.id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "{} already applied to job {}",
                principal.id, job_id
            )));
        }

        let mut application = Application::new(
            self.id_provider.generate_id(),
            now,
            job_id.clone(),
            principal.id.clone(),
        );
        application.cover_letter = req
            .cover_letter
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        application.resume_path = resume_path;

        self.application_repo.submit(&application).await?;

        info!(
            application_id = %application.id,
            job_id = %job_id,
            applicant = %principal.id,
            "Application received"
        );
        Ok(application)
    }

    /// Applications for a job: its poster or an admin
    ///
    /// Once the job is gone only admins can list the orphans.
    pub async fn list_for_job(&self, caller: &Caller, job_id: &JobId) -> Result<Vec<Application>> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "list applications")?;

        match self.job_repo.find_by_id(job_id).await? {
            Some(job) if principal.can_manage(&job) => {}
            Some(_) => {
                return Err(AppError::Forbidden(format!(
                    "job {} belongs to another employer",
                    job_id
                )))
            }
            None if principal.is_admin() => {}
            None => return Err(AppError::NotFound(format!("Job {} not found", job_id))),
        }

        self.application_repo.find_by_job(job_id).await
    }
}
