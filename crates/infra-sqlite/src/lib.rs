// Job Board Infrastructure - SQLite Adapter
// Implements: JobRepository, CompanyRepository (+ transactional removal), ApplicationRepository

mod application_repository;
mod company_repository;
mod connection;
mod error;
mod job_repository;
mod migration;
mod transaction;

pub use application_repository::SqliteApplicationRepository;
pub use company_repository::SqliteCompanyRepository;
pub use connection::create_pool;
pub use job_repository::SqliteJobRepository;
pub use migration::{current_version, run_migrations};
pub use transaction::SqliteCompanyTransaction;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{create_pool, run_migrations};
    use jobboard_core::domain::{
        EmploymentType, ExperienceRange, Job, JobDraft, Location, SalaryRange, WorkMode,
    };
    use sqlx::SqlitePool;

    /// Migrated in-memory database holding `company-1` (owned by `employer-1`)
    pub async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO companies (id, name, owner_id, created_at) VALUES ('company-1', 'Acme', 'employer-1', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    pub fn job(id: &str, created_at: i64) -> Job {
        Job::new(
            id,
            created_at,
            "employer-1",
            JobDraft {
                company_id: "company-1".to_string(),
                title: "Backend Engineer".to_string(),
                description: "Build and run the job board API".to_string(),
                category: "Engineering".to_string(),
                employment_type: EmploymentType::FullTime,
                work_mode: WorkMode::Hybrid,
                location: Location {
                    city: "Berlin".to_string(),
                    state: None,
                    country: Some("DE".to_string()),
                },
                salary: SalaryRange {
                    min: 60_000.0,
                    max: 80_000.0,
                    currency: "EUR".to_string(),
                },
                experience: ExperienceRange { min: 2.0, max: 5.0 },
                skills: vec!["rust".to_string(), "sql".to_string()],
                application_deadline: None,
            },
        )
    }
}
