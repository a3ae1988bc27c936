// Job Repository Port (Interface)

use crate::domain::{Job, JobFilter, JobId, JobQuery};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Job persistence
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job
    async fn insert(&self, job: &Job) -> Result<()>;

    /// Find job by ID
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>>;

    /// Persist content, status, featured flag and `updated_at`
    ///
    /// Counters are left alone; they only move through the increment methods.
    async fn update(&self, job: &Job) -> Result<()>;

    /// Hard delete (returns false if nothing was deleted)
    async fn delete(&self, id: &JobId) -> Result<bool>;

    /// One page of jobs matching the query
    async fn find(&self, query: &JobQuery) -> Result<Vec<Job>>;

    /// Number of jobs matching the filter (ignores pagination)
    async fn count(&self, filter: &JobFilter) -> Result<i64>;

    /// Atomically flip `featured`, returning the new value (None if job missing)
    async fn toggle_featured(&self, id: &JobId, now_millis: i64) -> Result<Option<bool>>;

    /// Bulk set `status = CLOSED` on every OPEN job whose deadline is before `now_millis`
    async fn close_overdue(&self, now_millis: i64) -> Result<u64>;

    async fn increment_views(&self, id: &JobId) -> Result<()>;
}
