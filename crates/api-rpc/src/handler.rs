//! RPC Method Handlers
//!
//! Authenticates the caller, then delegates to the application services.

use crate::error::to_rpc_error;
use crate::types::{
    ApplyRpcRequest, CompanyIdRequest, CompanyJobsRequest, CreateCompanyRpcRequest,
    CreateJobRpcRequest, DeleteCompanyResponse, DeleteJobResponse, ExpireResponse,
    FeaturedJobsRequest, JobIdRequest, SearchJobsRequest, ToggleFeaturedResponse, TokenOnly,
    UpdateJobRpcRequest,
};
use jobboard_core::application::{
    ApplicationService, CompanyService, JobLifecycleEngine, JobStats,
};
use jobboard_core::domain::{Application, Caller, Company, Job, Page};
use jobboard_core::port::AuthGate;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    engine: Arc<JobLifecycleEngine>,
    companies: Arc<CompanyService>,
    applications: Arc<ApplicationService>,
    auth: Arc<dyn AuthGate>,
}

impl RpcHandler {
    pub fn new(
        engine: Arc<JobLifecycleEngine>,
        companies: Arc<CompanyService>,
        applications: Arc<ApplicationService>,
        auth: Arc<dyn AuthGate>,
    ) -> Self {
        Self {
            engine,
            companies,
            applications,
            auth,
        }
    }

    async fn caller(&self, token: Option<&str>) -> RpcResult<Caller> {
        self.auth.authenticate(token).await.map_err(to_rpc_error)
    }

    /// jobs.search.v1
    pub async fn search_jobs(&self, params: SearchJobsRequest) -> RpcResult<Page<Job>> {
        self.engine
            .search_public(params.criteria)
            .await
            .map_err(to_rpc_error)
    }

    /// jobs.featured.v1
    pub async fn featured_jobs(&self, params: FeaturedJobsRequest) -> RpcResult<Vec<Job>> {
        self.engine
            .featured_public(params.limit)
            .await
            .map_err(to_rpc_error)
    }

    /// jobs.get.v1
    pub async fn get_job(&self, params: JobIdRequest) -> RpcResult<Job> {
        self.engine
            .get_public(&params.job_id)
            .await
            .map_err(to_rpc_error)
    }

    /// companies.jobs.v1
    pub async fn company_jobs(&self, params: CompanyJobsRequest) -> RpcResult<Page<Job>> {
        self.engine
            .company_jobs_public(&params.company_id, params.criteria)
            .await
            .map_err(to_rpc_error)
    }

    /// jobs.create.v1
    pub async fn create_job(&self, params: CreateJobRpcRequest) -> RpcResult<Job> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine
            .create(&caller, params.job)
            .await
            .map_err(to_rpc_error)
    }

    /// jobs.update.v1
    pub async fn update_job(&self, params: UpdateJobRpcRequest) -> RpcResult<Job> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine
            .update(&caller, &params.job_id, params.patch)
            .await
            .map_err(to_rpc_error)
    }

    /// jobs.close.v1
    pub async fn close_job(&self, params: JobIdRequest) -> RpcResult<Job> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine
            .close(&caller, &params.job_id)
            .await
            .map_err(to_rpc_error)
    }

    /// jobs.delete.v1
    pub async fn delete_job(&self, params: JobIdRequest) -> RpcResult<DeleteJobResponse> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine
            .delete(&caller, &params.job_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteJobResponse {
            job_id: params.job_id,
            deleted: true,
        })
    }

    /// jobs.feature.toggle.v1
    pub async fn toggle_featured(&self, params: JobIdRequest) -> RpcResult<ToggleFeaturedResponse> {
        let caller = self.caller(params.token.as_deref()).await?;
        let featured = self
            .engine
            .toggle_featured(&caller, &params.job_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ToggleFeaturedResponse {
            job_id: params.job_id,
            featured,
        })
    }

    /// admin.jobs.list.v1
    pub async fn admin_list_jobs(&self, params: SearchJobsRequest) -> RpcResult<Page<Job>> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine
            .list_admin(&caller, params.criteria)
            .await
            .map_err(to_rpc_error)
    }

    /// admin.jobs.get.v1
    pub async fn admin_get_job(&self, params: JobIdRequest) -> RpcResult<Job> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine
            .get_admin(&caller, &params.job_id)
            .await
            .map_err(to_rpc_error)
    }

    /// admin.expire.v1 - run the expiry sweep now
    pub async fn admin_expire(&self, params: TokenOnly) -> RpcResult<ExpireResponse> {
        let caller = self.caller(params.token.as_deref()).await?;
        caller
            .require_admin("run the expiry sweep")
            .map_err(to_rpc_error)?;

        let now = self.engine.now_millis();
        let closed = self
            .engine
            .expire_overdue_jobs(now)
            .await
            .map_err(to_rpc_error)?;

        Ok(ExpireResponse { closed, now })
    }

    /// admin.stats.v1
    pub async fn admin_stats(&self, params: TokenOnly) -> RpcResult<JobStats> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.engine.stats(&caller).await.map_err(to_rpc_error)
    }

    /// companies.create.v1
    pub async fn create_company(&self, params: CreateCompanyRpcRequest) -> RpcResult<Company> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.companies
            .create(&caller, params.company)
            .await
            .map_err(to_rpc_error)
    }

    /// companies.delete.v1
    pub async fn delete_company(&self, params: CompanyIdRequest) -> RpcResult<DeleteCompanyResponse> {
        let caller = self.caller(params.token.as_deref()).await?;
        let jobs_removed = self
            .companies
            .delete(&caller, &params.company_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteCompanyResponse {
            company_id: params.company_id,
            jobs_removed,
        })
    }

    /// applications.apply.v1
    pub async fn apply(&self, params: ApplyRpcRequest) -> RpcResult<Application> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.applications
            .apply(&caller, &params.job_id, params.application)
            .await
            .map_err(to_rpc_error)
    }

    /// applications.list.v1
    pub async fn list_applications(&self, params: JobIdRequest) -> RpcResult<Vec<Application>> {
        let caller = self.caller(params.token.as_deref()).await?;
        self.applications
            .list_for_job(&caller, &params.job_id)
            .await
            .map_err(to_rpc_error)
    }
}
