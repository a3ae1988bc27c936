// Company Service - registration and cascading removal

use crate::application::constants::MAX_COMPANY_NAME_LEN;
use crate::application::lifecycle::create::required_text;
use crate::domain::{Caller, Company, CompanyId, Role, ValidationErrors};
use crate::error::{AppError, Result};
use crate::port::{CompanyRepository, IdProvider, TimeProvider, TransactionalCompanyRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
}

pub struct CompanyService {
    company_repo: Arc<dyn CompanyRepository>,
    tx_repo: Arc<dyn TransactionalCompanyRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CompanyService {
    pub fn new(
        company_repo: Arc<dyn CompanyRepository>,
        tx_repo: Arc<dyn TransactionalCompanyRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            company_repo,
            tx_repo,
            id_provider,
            time_provider,
        }
    }

    pub async fn create(&self, caller: &Caller, req: CreateCompanyRequest) -> Result<Company> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "register companies")?;

        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", req.name.as_deref());
        if let Some(name) = &name {
            if name.chars().count() > MAX_COMPANY_NAME_LEN {
                errors.add(
                    "name",
                    format!("must be at most {} characters", MAX_COMPANY_NAME_LEN),
                );
            }
        }
        errors.into_result()?;
        let name = name.ok_or_else(|| AppError::Internal("validated name missing".to_string()))?;

        let company = Company::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            name,
            principal.id.clone(),
        );
        self.company_repo.insert(&company).await?;

        info!(company_id = %company.id, owner = %company.owner_id, "Company created");
        Ok(company)
    }

    pub async fn get(&self, company_id: &CompanyId) -> Result<Company> {
        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {} not found", company_id)))
    }

    /// Remove the company and all of its jobs atomically; returns jobs removed
    ///
    /// Applications to those jobs stay behind as orphans.
    pub async fn delete(&self, caller: &Caller, company_id: &CompanyId) -> Result<u64> {
        let principal = caller.require_role(&[Role::Employer, Role::Admin], "delete companies")?;
        let company = self.get(company_id).await?;
        if !principal.is_admin() && company.owner_id != principal.id {
            warn!(company_id = %company_id, user = %principal.id, "Rejected company delete by non-owner");
            return Err(AppError::Forbidden(format!(
                "company {} belongs to another employer",
                company_id
            )));
        }

        let mut tx = self.tx_repo.begin_transaction().await?;

        let removed = match tx.delete_jobs_by_company(company_id).await {
            Ok(n) => n,
            Err(e) => {
                rollback_quietly(tx).await;
                return Err(e);
            }
        };
        match tx.delete_company(company_id).await {
            Ok(true) => {}
            Ok(false) => {
                rollback_quietly(tx).await;
                return Err(AppError::NotFound(format!("Company {} not found", company_id)));
            }
            Err(e) => {
                rollback_quietly(tx).await;
                return Err(e);
            }
        }
        tx.commit().await?;

        info!(company_id = %company_id, jobs_removed = removed, by = %principal.id, "Company deleted");
        Ok(removed)
    }
}

async fn rollback_quietly(tx: Box<dyn crate::port::CompanyRemovalTransaction>) {
    if let Err(e) = tx.rollback().await {
        error!(error = %e, "Company removal rollback failed");
    }
}
