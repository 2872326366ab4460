use std::sync::Arc;

use crate::{
    database::AppDatabase,
    otp::{
        Clock, HttpMailer, LogNotifier, MemoryOtpStore, OtpConfig, OtpNotifier, OtpService,
        SystemClock,
    },
    stores::*,
};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub principals: Arc<dyn PrincipalStore>,
    pub apples: Arc<dyn AppleStore>,
    pub admin_requests: Arc<dyn AdminRequestStore>,
    pub images: Arc<dyn ImageStore>,
    pub otp: Arc<OtpService>,
}

impl AppState {
    /// Wire the state from independent stores. The OTP service shares the
    /// principal directory.
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        apples: Arc<dyn AppleStore>,
        admin_requests: Arc<dyn AdminRequestStore>,
        images: Arc<dyn ImageStore>,
        notifier: Arc<dyn OtpNotifier>,
        clock: Arc<dyn Clock>,
        otp_config: OtpConfig,
    ) -> Self {
        let otp = OtpService::new(
            Arc::new(MemoryOtpStore::new()),
            principals.clone(),
            notifier,
            clock,
            otp_config,
        );
        Self {
            principals,
            apples,
            admin_requests,
            images,
            otp: Arc::new(otp),
        }
    }

    /// Production wiring from the environment
    pub async fn from_env(db: Arc<AppDatabase>) -> Self {
        let images: Arc<dyn ImageStore> = match std::env::var("IMAGE_STORE").as_deref() {
            Ok("s3") => Arc::new(S3ImageStore::from_env().await),
            _ => Arc::new(LocalImageStore::from_env()),
        };
        let otp_config = OtpConfig::from_env();
        let notifier: Arc<dyn OtpNotifier> = match HttpMailer::from_env(otp_config.code_ttl_secs) {
            Some(mailer) => Arc::new(mailer),
            None => {
                tracing::warn!("MAIL_API_URL not set, login codes will only be logged");
                Arc::new(LogNotifier)
            }
        };
        Self::new(
            Arc::new(MongoPrincipalStore::new(db.clone())),
            Arc::new(MongoAppleStore::new(db.clone())),
            Arc::new(MongoAdminRequestStore::new(db)),
            images,
            notifier,
            Arc::new(SystemClock),
            otp_config,
        )
    }
}
