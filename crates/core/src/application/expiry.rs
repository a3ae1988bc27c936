// Expiry Sweeper - periodic close of overdue jobs
// Constructed by the composition root only; stopped through its handle.

use crate::application::lifecycle::JobLifecycleEngine;
use crate::application::stop_signal::{stop_signal, StopSignal, StopTrigger};
use crate::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Whether this process runs the sweep timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepMode {
    /// Long-lived process: run the timer
    #[default]
    Background,
    /// Short-lived process: read-time visibility only
    Disabled,
}

impl std::str::FromStr for SweepMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" => Ok(SweepMode::Background),
            "disabled" | "off" | "serverless" => Ok(SweepMode::Disabled),
            other => Err(AppError::Config(format!(
                "unknown sweep mode '{}' (expected background or disabled)",
                other
            ))),
        }
    }
}

pub struct ExpirySweeper {
    engine: Arc<JobLifecycleEngine>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(engine: Arc<JobLifecycleEngine>, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// One sweep at the engine's current time
    ///
    /// Failures are logged and reported as zero closed jobs; the next tick retries.
    pub async fn sweep_once(&self) -> u64 {
        let now = self.engine.now_millis();
        match self.engine.expire_overdue_jobs(now).await {
            Ok(closed) => closed,
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Expiry sweep skipped: store unavailable");
                0
            }
            Err(e) => {
                error!(error = ?e, "Expiry sweep failed");
                0
            }
        }
    }

    /// Tick until `stop` is raised (first sweep runs immediately)
    pub async fn run(self, mut stop: StopSignal) {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            "Expiry sweeper started"
        );

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.sweep_once().await;
                }
                _ = stop.raised() => {
                    break;
                }
            }
        }

        info!("Expiry sweeper stopped");
    }

    /// Start the timer on the current runtime
    pub fn spawn(self) -> SweeperHandle {
        let (trigger, signal) = stop_signal();
        let task = tokio::spawn(self.run(signal));
        SweeperHandle { trigger, task }
    }
}

/// Running sweeper; dropping it also ends the loop, without waiting for it
pub struct SweeperHandle {
    trigger: StopTrigger,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Raise the stop and wait for the loop to exit
    pub async fn stop(self) {
        self.trigger.raise();
        if let Err(e) = self.task.await {
            error!(error = %e, "Expiry sweeper task ended abnormally");
        }
    }
}
