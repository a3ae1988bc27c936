//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over HTTP (jsonrpsee).

use crate::error::RpcServerError;
use crate::handler::RpcHandler;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::error::INVALID_PARAMS_CODE;
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9640;

/// Method names, one entry per registered RPC
pub const METHODS: &[&str] = &[
    "jobs.search.v1",
    "jobs.featured.v1",
    "jobs.get.v1",
    "companies.jobs.v1",
    "jobs.create.v1",
    "jobs.update.v1",
    "jobs.close.v1",
    "jobs.delete.v1",
    "jobs.feature.toggle.v1",
    "admin.jobs.list.v1",
    "admin.jobs.get.v1",
    "admin.expire.v1",
    "admin.stats.v1",
    "companies.create.v1",
    "companies.delete.v1",
    "applications.apply.v1",
    "applications.list.v1",
];

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// Register one method: parse params as `P`, hand them to `call`
fn register<P, R, F, Fut>(
    module: &mut RpcModule<()>,
    name: &'static str,
    handler: &Arc<RpcHandler>,
    call: F,
) -> Result<(), RpcServerError>
where
    P: DeserializeOwned + Send + 'static,
    R: Serialize + Clone + Send + 'static,
    F: Fn(Arc<RpcHandler>, P) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ErrorObjectOwned>> + Send + 'static,
{
    let handler = handler.clone();
    module
        .register_async_method(name, move |params, _, _| {
            let handler = handler.clone();
            let call = call.clone();
            async move {
                // Omitted params read as an empty object
                let req: P = match params.as_str() {
                    Some(_) => params.parse()?,
                    None => serde_json::from_str("{}").map_err(|e| {
                        ErrorObjectOwned::owned(INVALID_PARAMS_CODE, e.to_string(), None::<()>)
                    })?,
                };
                call(handler, req).await
            }
        })
        .map_err(|e| RpcServerError::Register(format!("{}: {}", name, e)))?;
    Ok(())
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, handler: Arc<RpcHandler>) -> Self {
        Self { config, handler }
    }

    /// Every job board method on one module
    pub fn build_module(&self) -> Result<RpcModule<()>, RpcServerError> {
        let mut module = RpcModule::new(());
        let h = &self.handler;

        // Public reads
        register(&mut module, "jobs.search.v1", h, |h, p| async move {
            h.search_jobs(p).await
        })?;
        register(&mut module, "jobs.featured.v1", h, |h, p| async move {
            h.featured_jobs(p).await
        })?;
        register(&mut module, "jobs.get.v1", h, |h, p| async move { h.get_job(p).await })?;
        register(&mut module, "companies.jobs.v1", h, |h, p| async move {
            h.company_jobs(p).await
        })?;

        // Employer (owner) / admin
        register(&mut module, "jobs.create.v1", h, |h, p| async move {
            h.create_job(p).await
        })?;
        register(&mut module, "jobs.update.v1", h, |h, p| async move {
            h.update_job(p).await
        })?;
        register(&mut module, "jobs.close.v1", h, |h, p| async move {
            h.close_job(p).await
        })?;
        register(&mut module, "jobs.delete.v1", h, |h, p| async move {
            h.delete_job(p).await
        })?;

        // Admin
        register(&mut module, "jobs.feature.toggle.v1", h, |h, p| async move {
            h.toggle_featured(p).await
        })?;
        register(&mut module, "admin.jobs.list.v1", h, |h, p| async move {
            h.admin_list_jobs(p).await
        })?;
        register(&mut module, "admin.jobs.get.v1", h, |h, p| async move {
            h.admin_get_job(p).await
        })?;
        register(&mut module, "admin.expire.v1", h, |h, p| async move {
            h.admin_expire(p).await
        })?;
        register(&mut module, "admin.stats.v1", h, |h, p| async move {
            h.admin_stats(p).await
        })?;

        // Companies
        register(&mut module, "companies.create.v1", h, |h, p| async move {
            h.create_company(p).await
        })?;
        register(&mut module, "companies.delete.v1", h, |h, p| async move {
            h.delete_company(p).await
        })?;

        // Applications
        register(&mut module, "applications.apply.v1", h, |h, p| async move {
            h.apply(p).await
        })?;
        register(&mut module, "applications.list.v1", h, |h, p| async move {
            h.list_applications(p).await
        })?;

        Ok(module)
    }

    /// Bind and start serving; returns the bound address and the server handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), RpcServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let module = self.build_module()?;

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| RpcServerError::Bind {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;
        let local_addr = server.local_addr().map_err(|e| RpcServerError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        info!(
            addr = %local_addr,
            methods = METHODS.len(),
            "JSON-RPC server started"
        );

        Ok((local_addr, server.start(module)))
    }
}
