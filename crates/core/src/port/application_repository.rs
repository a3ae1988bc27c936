// Application Repository Port (Interface)

use crate::domain::{Application, JobId, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Store the application and bump its job's `applications_count` as one unit
    ///
    /// On error neither change is visible.
    async fn submit(&self, application: &Application) -> Result<()>;

    /// All applications referencing `job_id`, oldest first (the job may no longer exist)
    async fn find_by_job(&self, job_id: &JobId) -> Result<Vec<Application>>;

    /// Has `applicant_id` already applied to `job_id`?
    async fn exists(&self, job_id: &JobId, applicant_id: &UserId) -> Result<bool>;
}
