// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobboard_core::domain::CompanyId;
use jobboard_core::error::Result;
use jobboard_core::port::{CompanyRemovalTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

/// Company cascade inside one SQLite transaction
///
/// Dropped without commit, sqlx rolls the transaction back.
pub struct SqliteCompanyTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteCompanyTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteCompanyTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl CompanyRemovalTransaction for SqliteCompanyTransaction<'_> {
    async fn delete_jobs_by_company(&mut self, company_id: &CompanyId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM jobs WHERE company_id = ?")
            .bind(company_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_company(&mut self, company_id: &CompanyId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(company_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
