// SQLite CompanyRepository Implementation

use crate::error::map_sqlx_error;
use crate::SqliteCompanyTransaction;
use async_trait::async_trait;
use jobboard_core::domain::{Company, CompanyId};
use jobboard_core::error::Result;
use jobboard_core::port::{
    CompanyRemovalTransaction, CompanyRepository, TransactionalCompanyRepository,
};
use sqlx::SqlitePool;

pub struct SqliteCompanyRepository {
    pool: SqlitePool,
}

impl SqliteCompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for SqliteCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<()> {
        sqlx::query("INSERT INTO companies (id, name, owner_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&company.id)
            .bind(&company.name)
            .bind(&company.owner_id)
            .bind(company.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name, owner_id, created_at FROM companies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CompanyRow::into_company))
    }
}

#[async_trait]
impl TransactionalCompanyRepository for SqliteCompanyRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn CompanyRemovalTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteCompanyTransaction::new(tx)))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    owner_id: String,
    created_at: i64,
}

impl CompanyRow {
    fn into_company(self) -> Company {
        Company {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }
}
