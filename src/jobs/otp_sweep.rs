use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle, time::interval};

use crate::otp::OtpService;

/// Owner of the running sweep task
pub struct SweepHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the job to stop and wait for it to exit
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            tracing::warn!("otp sweep job ended abnormally: {:?}", err);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Periodically removes expired login codes
pub fn spawn_otp_sweep_job(service: Arc<OtpService>, period: Duration) -> SweepHandle {
    let (shutdown, mut stop_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        tracing::debug!("initializing otp sweep job");
        let mut interval = interval(period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = service.sweep_expired().await;
                    if removed > 0 {
                        tracing::debug!("otp sweep removed {removed} expired entries");
                    }
                }
                _ = stop_rx.changed() => {
                    tracing::debug!("otp sweep job stopped");
                    break;
                }
            }
        }
    });
    SweepHandle { shutdown, task }
}
