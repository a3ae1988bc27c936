// Port Layer - Interfaces for external dependencies

pub mod application_repository;
pub mod auth_gate;
pub mod company_repository;
pub mod id_provider; // For deterministic testing
pub mod job_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use application_repository::ApplicationRepository;
pub use auth_gate::AuthGate;
pub use company_repository::CompanyRepository;
pub use id_provider::IdProvider;
pub use job_repository::JobRepository;
pub use time_provider::TimeProvider;
pub use transaction::{CompanyRemovalTransaction, Transaction, TransactionalCompanyRepository};
