// Transaction port for atomic operations

use crate::domain::CompanyId;
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Company operations that must run inside one transaction
#[async_trait]
pub trait TransactionalCompanyRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn CompanyRemovalTransaction>>;
}

/// Company removal with its jobs (within transaction)
#[async_trait]
pub trait CompanyRemovalTransaction: Transaction {
    /// Delete every job owned by the company
    async fn delete_jobs_by_company(&mut self, company_id: &CompanyId) -> Result<u64>;

    /// Delete the company row itself (returns false if it did not exist)
    async fn delete_company(&mut self, company_id: &CompanyId) -> Result<bool>;
}
