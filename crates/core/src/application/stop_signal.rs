// Stop signal between a SweeperHandle and its sweep loop

use tokio::sync::watch;

/// Loop side of the signal, passed to `ExpirySweeper::run`
///
/// A stop raised before the loop first polls is not lost, and clones
/// observe the same signal.
#[derive(Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_raised(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop is raised or the trigger is dropped
    pub async fn raised(&mut self) {
        if self.is_raised() {
            return;
        }
        // Err means the trigger is gone; nobody is left to keep the loop alive
        let _ = self.rx.changed().await;
    }
}

/// Handle side of the signal
pub struct StopTrigger {
    tx: watch::Sender<bool>,
}

impl StopTrigger {
    /// Ask the sweep loop to finish its current tick and exit
    pub fn raise(&self) {
        self.tx.send_replace(true);
    }
}

pub fn stop_signal() -> (StopTrigger, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopTrigger { tx }, StopSignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_stop_raised_before_waiting_is_seen() {
        let (trigger, mut signal) = stop_signal();
        let observer = signal.clone();
        assert!(!signal.is_raised());

        trigger.raise();
        timeout(Duration::from_secs(1), signal.raised())
            .await
            .expect("raised stop was lost");
        assert!(observer.is_raised());
    }

    #[tokio::test]
    async fn test_dropped_trigger_releases_loop() {
        let (trigger, mut signal) = stop_signal();
        let waiter = tokio::spawn(async move { signal.raised().await });

        drop(trigger);
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("loop kept waiting on a dropped trigger")
            .unwrap();
    }
}
