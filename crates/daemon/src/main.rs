//! Job Board Daemon - Main Entry Point
//! JSON-RPC server plus the background expiry sweeper

mod config;
mod logging;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use config::DaemonConfig;
use jobboard_api_rpc::{server::RpcServerConfig, RpcHandler, RpcServer, StaticTokenAuthGate};
use jobboard_core::application::{
    ApplicationService, CompanyService, ExpirySweeper, JobLifecycleEngine, SweepMode,
};
use jobboard_core::port::id_provider::UuidProvider;
use jobboard_core::port::time_provider::SystemTimeProvider;
use jobboard_infra_sqlite::{
    create_pool, current_version, run_migrations, SqliteApplicationRepository,
    SqliteCompanyRepository, SqliteJobRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration, then logging (the log setup reads the config)
    let config = DaemonConfig::from_env().context("invalid configuration")?;
    let _log_guard = logging::init(&config)?;

    info!("Job board daemon v{} starting...", VERSION);

    // 2. Database
    let db_url = config.database_url();
    if !db_url.contains(":memory:") && !config.db_path.starts_with("sqlite:") {
        if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }

    info!(db_url = %db_url, "Initializing database...");
    let pool = create_pool(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    let schema_version = current_version(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Schema version check failed: {}", e))?;
    info!(schema_version, "Database ready");

    // 3. DI wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let job_repo = Arc::new(SqliteJobRepository::new(pool.clone()));
    let company_repo = Arc::new(SqliteCompanyRepository::new(pool.clone()));
    let application_repo = Arc::new(SqliteApplicationRepository::new(pool.clone()));

    let engine = Arc::new(JobLifecycleEngine::new(
        job_repo.clone(),
        company_repo.clone(),
        id_provider.clone(),
        time_provider.clone(),
    ));
    let companies = Arc::new(CompanyService::new(
        company_repo.clone(),
        company_repo,
        id_provider.clone(),
        time_provider.clone(),
    ));
    let applications = Arc::new(ApplicationService::new(
        job_repo,
        application_repo,
        id_provider,
        time_provider,
    ));

    let auth = StaticTokenAuthGate::parse(&config.api_tokens)
        .map_err(|e| anyhow::anyhow!("JOBBOARD_API_TOKENS: {}", e))?;
    if auth.is_empty() {
        warn!("No API tokens configured; only public reads will succeed");
    } else {
        info!(tokens = auth.len(), "API tokens loaded");
    }

    // 4. JSON-RPC server
    info!("Starting JSON-RPC server...");
    let handler = Arc::new(RpcHandler::new(
        engine.clone(),
        companies,
        applications,
        Arc::new(auth),
    ));
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (rpc_addr, rpc_handle) = RpcServer::new(rpc_config, handler)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 5. Expiry sweeper
    let sweeper = match config.sweep_mode {
        SweepMode::Background => {
            info!(
                interval_secs = config.sweep_interval.as_secs(),
                "Starting expiry sweeper..."
            );
            Some(ExpirySweeper::new(engine, config.sweep_interval).spawn())
        }
        SweepMode::Disabled => {
            info!("Expiry sweeper disabled; expiry runs through admin.expire.v1 only");
            None
        }
    };

    info!(addr = %rpc_addr, "Job board daemon ready");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping...");

    if let Some(sweeper) = sweeper {
        sweeper.stop().await;
        info!("Expiry sweeper stopped");
    }

    if let Err(e) = rpc_handle.stop() {
        warn!(error = ?e, "RPC server was already stopped");
    }
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Job board daemon stopped");
    Ok(())
}
