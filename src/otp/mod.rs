//! Passwordless login with emailed one-time codes.
//!
//! Codes are kept only as SHA-256 digests in an [`OtpStore`], one entry per
//! principal kind and email. Requesting a code never reveals whether the
//! account exists; verifying one either yields a signed session token or one
//! of the two [`OtpError`] kinds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{constants::*, models::PrincipalProfile};

pub mod clock;
pub mod notifier;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{HttpMailer, LogNotifier, OtpNotifier};
#[cfg(test)]
pub use notifier::MockOtpNotifier;
pub use service::OtpService;
pub use store::{MemoryOtpStore, OtpStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpEntry {
    pub hashed_code: String,
    pub expires_at: u64,
    pub attempts: u32,
    pub last_sent_at: u64,
}

impl OtpEntry {
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("{}", OTP_INVALID_MSG)]
    InvalidOrExpiredCode,
    #[error("{}", OTP_TOO_MANY_ATTEMPTS_MSG)]
    TooManyAttempts,
}

/// Tunables for code issuance and verification
#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub code_ttl_secs: u64,
    pub resend_cooldown_secs: u64,
    pub max_attempts: u32,
    pub sweep_interval: Duration,
    pub notify_timeout: Duration,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: OTP_VALIDITY_SECS,
            resend_cooldown_secs: OTP_RESEND_COOLDOWN_SECS,
            max_attempts: OTP_MAX_ATTEMPTS,
            sweep_interval: Duration::from_secs(OTP_SWEEP_INTERVAL_SECS),
            notify_timeout: Duration::from_secs(OTP_NOTIFY_TIMEOUT_SECS),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<T>().ok())
        .unwrap_or(default)
}

impl OtpConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        let sweep_secs = env_or("OTP_SWEEP_INTERVAL_SECS", OTP_SWEEP_INTERVAL_SECS);
        Self {
            code_ttl_secs: env_or("OTP_EXPIRY_SECS", default.code_ttl_secs),
            resend_cooldown_secs: env_or("OTP_RESEND_COOLDOWN_SECS", default.resend_cooldown_secs),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", default.max_attempts),
            sweep_interval: Duration::from_secs(sweep_secs.max(1)),
            notify_timeout: default.notify_timeout,
        }
    }
}

/// Outcome of a successful code verification
#[derive(Debug, Clone)]
pub struct VerifiedLogin {
    pub token: String,
    pub user: PrincipalProfile,
}
