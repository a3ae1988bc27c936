// Company Repository Port (Interface)

use crate::domain::{Company, CompanyId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn insert(&self, company: &Company) -> Result<()>;

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>>;
}
