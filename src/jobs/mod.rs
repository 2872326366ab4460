use std::sync::Arc;

use self::otp_sweep::{spawn_otp_sweep_job, SweepHandle};
use crate::otp::OtpService;

pub mod otp_sweep;

/// Handles of every background job, stopped together on shutdown
pub struct JobHandles {
    otp_sweep: SweepHandle,
}

impl JobHandles {
    pub async fn stop(self) {
        self.otp_sweep.stop().await;
    }
}

pub fn spawn_all_jobs(otp: Arc<OtpService>) -> JobHandles {
    let period = otp.config().sweep_interval;
    // spawn job to drop expired login codes
    let otp_sweep = spawn_otp_sweep_job(otp, period);
    JobHandles { otp_sweep }
}
