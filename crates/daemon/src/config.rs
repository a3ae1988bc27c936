//! Daemon configuration from `JOBBOARD_*` environment variables

use anyhow::{bail, Context, Result};
use jobboard_core::application::constants::DEFAULT_SWEEP_INTERVAL;
use jobboard_core::application::SweepMode;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "~/.jobboard/jobboard.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub sweep_mode: SweepMode,
    pub sweep_interval: Duration,
    /// `token:user_id:role` entries, comma separated
    pub api_tokens: String,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_path = shellexpand::tilde(
            &get("JOBBOARD_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
        )
        .into_owned();

        let rpc_host = get("JOBBOARD_RPC_HOST")
            .unwrap_or_else(|| jobboard_api_rpc::server::DEFAULT_RPC_HOST.to_string());

        let rpc_port = match get("JOBBOARD_RPC_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("JOBBOARD_RPC_PORT is not a port: {}", raw))?,
            None => jobboard_api_rpc::server::DEFAULT_RPC_PORT,
        };

        let sweep_mode = match get("JOBBOARD_SWEEP_MODE") {
            Some(raw) => raw.parse::<SweepMode>()?,
            None => SweepMode::default(),
        };

        let sweep_interval = match get("JOBBOARD_SWEEP_INTERVAL_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .with_context(|| format!("JOBBOARD_SWEEP_INTERVAL_SECS is not a number: {}", raw))?;
                if secs == 0 {
                    bail!("JOBBOARD_SWEEP_INTERVAL_SECS must be positive");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SWEEP_INTERVAL,
        };

        let log_format = match get("JOBBOARD_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("JOBBOARD_LOG_FORMAT must be pretty or json, got {}", other),
        };

        let log_dir = get("JOBBOARD_LOG_DIR").map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned()));

        Ok(Self {
            db_path,
            rpc_host,
            rpc_port,
            sweep_mode,
            sweep_interval,
            api_tokens: get("JOBBOARD_API_TOKENS").unwrap_or_default(),
            log_format,
            log_dir,
        })
    }

    /// sqlx URL for `db_path` (`:memory:` and explicit URLs pass through)
    pub fn database_url(&self) -> String {
        if self.db_path.starts_with("sqlite:") {
            self.db_path.clone()
        } else if self.db_path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}", self.db_path)
        }
    }
}
