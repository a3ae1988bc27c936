// Domain Layer - Pure business logic and entities

pub mod application;
pub mod company;
pub mod error;
pub mod job;
pub mod principal;
pub mod query;
pub mod validation;

// Re-exports
pub use application::{normalize_resume_path, Application, ApplicationId};
pub use company::Company;
pub use error::DomainError;
pub use job::{
    is_visible, CompanyId, EmploymentType, ExperienceRange, Job, JobDraft, JobId, JobStatus,
    Location, SalaryRange, UserId, WorkMode,
};
pub use principal::{Caller, Principal, Role};
pub use query::{JobFilter, JobQuery, JobSort, Page, PageRequest, Visibility};
pub use validation::{FieldError, ValidationErrors};
