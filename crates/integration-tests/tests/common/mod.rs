//! Shared wiring for the integration tests: real SQLite (in memory) behind
//! the real services, with a manual clock and sequential ids.

#![allow(dead_code)]

use std::sync::Arc;

use jobboard_core::application::{
    ApplicationService, CompanyService, CreateCompanyRequest, CreateJobRequest,
    JobLifecycleEngine,
};
use jobboard_core::domain::{Caller, Company, Job, Principal, Role};
use jobboard_core::port::id_provider::mocks::SequentialIdProvider;
use jobboard_core::port::time_provider::mocks::ManualTimeProvider;
use jobboard_infra_sqlite::{
    create_pool, run_migrations, SqliteApplicationRepository, SqliteCompanyRepository,
    SqliteJobRepository,
};
use serde_json::json;
use sqlx::SqlitePool;

pub const NOW: i64 = 1_700_000_000_000;
pub const DAY: i64 = 24 * 60 * 60 * 1000;

pub struct Board {
    pub pool: SqlitePool,
    pub clock: Arc<ManualTimeProvider>,
    pub engine: Arc<JobLifecycleEngine>,
    pub companies: Arc<CompanyService>,
    pub applications: Arc<ApplicationService>,
}

impl Board {
    pub async fn new() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let clock = Arc::new(ManualTimeProvider::new(NOW));
        let job_repo = Arc::new(SqliteJobRepository::new(pool.clone()));
        let company_repo = Arc::new(SqliteCompanyRepository::new(pool.clone()));
        let application_repo = Arc::new(SqliteApplicationRepository::new(pool.clone()));

        let engine = Arc::new(JobLifecycleEngine::new(
            job_repo.clone(),
            company_repo.clone(),
            Arc::new(SequentialIdProvider::new("job")),
            clock.clone(),
        ));
        let companies = Arc::new(CompanyService::new(
            company_repo.clone(),
            company_repo,
            Arc::new(SequentialIdProvider::new("company")),
            clock.clone(),
        ));
        let applications = Arc::new(ApplicationService::new(
            job_repo,
            application_repo,
            Arc::new(SequentialIdProvider::new("application")),
            clock.clone(),
        ));

        Self {
            pool,
            clock,
            engine,
            companies,
            applications,
        }
    }

    pub async fn company(&self, owner: &Caller, name: &str) -> Company {
        self.companies
            .create(
                owner,
                CreateCompanyRequest {
                    name: Some(name.to_string()),
                },
            )
            .await
            .unwrap()
    }

    pub async fn post(&self, owner: &Caller, company_id: &str, deadline: Option<i64>) -> Job {
        self.engine
            .create(owner, posting(company_id, "Backend Engineer", deadline))
            .await
            .unwrap()
    }
}

pub fn employer() -> Caller {
    Caller::Authenticated(Principal::new("employer-1", Role::Employer))
}

pub fn other_employer() -> Caller {
    Caller::Authenticated(Principal::new("employer-2", Role::Employer))
}

pub fn admin() -> Caller {
    Caller::Authenticated(Principal::new("admin-1", Role::Admin))
}

pub fn seeker(id: &str) -> Caller {
    Caller::Authenticated(Principal::new(id, Role::Jobseeker))
}

/// A complete, valid job posting
pub fn posting(company_id: &str, title: &str, deadline: Option<i64>) -> CreateJobRequest {
    serde_json::from_value(json!({
        "company_id": company_id,
        "title": title,
        "description": "Build and run the matching service",
        "category": "Engineering",
        "employment_type": "FULL_TIME",
        "work_mode": "HYBRID",
        "location": {"city": "Berlin", "country": "DE"},
        "salary": {"min": 60000, "max": 80000, "currency": "EUR"},
        "experience": {"min": 2, "max": 5},
        "skills": ["Rust", "SQL"],
        "application_deadline": deadline
    }))
    .unwrap()
}
