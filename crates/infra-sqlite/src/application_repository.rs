// SQLite ApplicationRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobboard_core::domain::{Application, JobId, UserId};
use jobboard_core::error::Result;
use jobboard_core::port::ApplicationRepository;
use sqlx::SqlitePool;

pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
    async fn submit(&self, application: &Application) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("UPDATE jobs SET applications_count = applications_count + 1 WHERE id = ?")
            .bind(&application.job_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        // Dropping `tx` on a failed insert rolls the counter back. The unique
        // (job_id, applicant_id) index turns a racing duplicate into Conflict
        sqlx::query(
            r#"
            INSERT INTO applications (id, job_id, applicant_id, cover_letter, resume_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.applicant_id)
        .bind(&application.cover_letter)
        .bind(&application.resume_path)
        .bind(application.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn find_by_job(&self, job_id: &JobId) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, job_id, applicant_id, cover_letter, resume_path, created_at
            FROM applications
            WHERE job_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ApplicationRow::into_application).collect())
    }

    async fn exists(&self, job_id: &JobId, applicant_id: &UserId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications WHERE job_id = ? AND applicant_id = ?",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    job_id: String,
    applicant_id: String,
    cover_letter: Option<String>,
    resume_path: Option<String>,
    created_at: i64,
}

impl ApplicationRow {
    fn into_application(self) -> Application {
        Application {
            id: self.id,
            job_id: self.job_id,
            applicant_id: self.applicant_id,
            cover_letter: self.cover_letter,
            resume_path: self.resume_path,
            created_at: self.created_at,
        }
    }
}
