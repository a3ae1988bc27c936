//! RPC Request/Response Types
//!
//! Every request object may carry `token`; the rest of the object is the
//! method's own parameters.

use jobboard_core::application::{
    ApplyRequest, CreateCompanyRequest, CreateJobRequest, SearchCriteria, UpdateJobRequest,
};
use serde::{Deserialize, Serialize};

/// admin.expire.v1, admin.stats.v1 - no parameters beyond the token
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TokenOnly {
    pub token: Option<String>,
}

/// jobs.search.v1, admin.jobs.list.v1
#[derive(Debug, Default, Deserialize)]
pub struct SearchJobsRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub criteria: SearchCriteria,
}

/// jobs.featured.v1
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeaturedJobsRequest {
    pub token: Option<String>,
    pub limit: Option<u32>,
}

/// jobs.get.v1, jobs.close.v1, jobs.delete.v1, jobs.feature.toggle.v1,
/// admin.jobs.get.v1, applications.list.v1
#[derive(Debug, Deserialize)]
pub struct JobIdRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub job_id: String,
}

/// companies.jobs.v1
#[derive(Debug, Deserialize)]
pub struct CompanyJobsRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub company_id: String,
    #[serde(flatten)]
    pub criteria: SearchCriteria,
}

/// jobs.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateJobRpcRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub job: CreateJobRequest,
}

/// jobs.update.v1
#[derive(Debug, Deserialize)]
pub struct UpdateJobRpcRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub job_id: String,
    #[serde(flatten)]
    pub patch: UpdateJobRequest,
}

/// companies.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRpcRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub company: CreateCompanyRequest,
}

/// companies.delete.v1
#[derive(Debug, Deserialize)]
pub struct CompanyIdRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub company_id: String,
}

/// applications.apply.v1
#[derive(Debug, Deserialize)]
pub struct ApplyRpcRequest {
    #[serde(default)]
    pub token: Option<String>,
    pub job_id: String,
    #[serde(flatten)]
    pub application: ApplyRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleFeaturedResponse {
    pub job_id: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteJobResponse {
    pub job_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpireResponse {
    pub closed: u64,
    pub now: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCompanyResponse {
    pub company_id: String,
    pub jobs_removed: u64,
}
