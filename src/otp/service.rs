use std::sync::Arc;

use super::{Clock, OtpConfig, OtpEntry, OtpError, OtpNotifier, OtpStore, VerifiedLogin};
use crate::{
    constants::*,
    jwt::JWT_KEYS,
    models::{GenericResponse, PrincipalKind, PrincipalProfile},
    stores::PrincipalStore,
    utils::{generate_otp, hash_code, is_valid_email, normalize_email, AppError},
};

pub struct OtpService {
    store: Arc<dyn OtpStore>,
    principals: Arc<dyn PrincipalStore>,
    notifier: Arc<dyn OtpNotifier>,
    clock: Arc<dyn Clock>,
    config: OtpConfig,
}

fn is_well_formed_code(code: &str) -> bool {
    code.len() == OTP_LENGTH as usize && code.chars().all(|ch| ch.is_ascii_digit())
}

impl OtpService {
    pub fn new(
        store: Arc<dyn OtpStore>,
        principals: Arc<dyn PrincipalStore>,
        notifier: Arc<dyn OtpNotifier>,
        clock: Arc<dyn Clock>,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            principals,
            notifier,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Issue a login code if an active principal owns `email`.
    /// The reply is the same whatever happened.
    pub async fn request_code(&self, kind: PrincipalKind, email: &str) -> GenericResponse {
        if let Err(err) = self.issue_code(kind, email).await {
            tracing::warn!("Unable to issue {kind} login code: {:?}", err);
        }
        GenericResponse {
            success: true,
            message: OTP_REQUEST_ACK.to_owned(),
        }
    }

    async fn issue_code(&self, kind: PrincipalKind, email: &str) -> anyhow::Result<()> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            tracing::debug!("Ignoring login code request for malformed email");
            return Ok(());
        }
        let now = self.clock.now();
        if let Some(entry) = self.store.get(kind, &email).await? {
            if now < entry.last_sent_at + self.config.resend_cooldown_secs {
                tracing::debug!("Login code for {email} requested within cooldown");
                return Ok(());
            }
        }
        let principal = self.principals.find_by_email(kind, &email).await?;
        match principal {
            Some(principal) if principal.is_active => {}
            _ => {
                tracing::debug!("No active {kind} for {email}, nothing sent");
                return Ok(());
            }
        }
        let code = generate_otp();
        let entry = OtpEntry {
            hashed_code: hash_code(&code),
            expires_at: now + self.config.code_ttl_secs,
            attempts: 0,
            last_sent_at: now,
        };
        self.store.put(kind, &email, entry).await?;
        self.dispatch(kind, email, code);
        Ok(())
    }

    /// Fire and forget delivery, bounded by the notification timeout
    fn dispatch(&self, kind: PrincipalKind, email: String, code: String) {
        let notifier = self.notifier.clone();
        let timeout = self.config.notify_timeout;
        tokio::spawn(async move {
            let send = notifier.send_code(kind, &email, &code);
            match tokio::time::timeout(timeout, send).await {
                Ok(Ok(())) => tracing::debug!("Login code dispatched to {email}"),
                Ok(Err(err)) => tracing::warn!("Login code dispatch to {email} failed: {:?}", err),
                Err(_) => tracing::warn!("Login code dispatch to {email} timed out"),
            }
        });
    }

    /// Check a submitted code. On success the entry is consumed and a session
    /// token is issued for the principal.
    pub async fn verify_code(
        &self,
        kind: PrincipalKind,
        email: &str,
        code: &str,
    ) -> Result<VerifiedLogin, AppError> {
        let invalid = || AppError::Otp(OtpError::InvalidOrExpiredCode);
        let code = code.trim();
        if !is_well_formed_code(code) {
            return Err(invalid());
        }
        let email = normalize_email(email);
        let entry = self
            .store
            .get(kind, &email)
            .await
            .map_err(|err| {
                tracing::error!("otp store read failed: {:?}", err);
                invalid()
            })?
            .ok_or_else(invalid)?;
        let now = self.clock.now();
        if entry.is_expired(now) {
            self.discard(kind, &email).await;
            return Err(invalid());
        }
        if entry.attempts >= self.config.max_attempts {
            self.discard(kind, &email).await;
            return Err(AppError::Otp(OtpError::TooManyAttempts));
        }
        let hashed = hash_code(code);
        if hashed != entry.hashed_code {
            let result = self
                .store
                .record_failed_attempt(kind, &email, &entry.hashed_code)
                .await;
            if let Err(err) = result {
                tracing::error!("otp store write failed: {:?}", err);
            }
            return Err(invalid());
        }
        // a concurrent verify may have consumed the entry already
        let consumed = self.store.consume(kind, &email, &hashed).await.map_err(|err| {
            tracing::error!("otp store write failed: {:?}", err);
            invalid()
        })?;
        if consumed.is_none() {
            return Err(invalid());
        }
        let principal = self.principals.find_by_email(kind, &email).await.map_err(|err| {
            tracing::error!("principal lookup after otp consume failed: {:?}", err);
            invalid()
        })?;
        let mut principal = match principal {
            Some(principal) if principal.is_active => principal,
            _ => return Err(invalid()),
        };
        if let Err(err) = self.principals.touch_last_login(kind, principal.id, now).await {
            tracing::warn!("Unable to update last login of {kind} {}: {:?}", principal.id, err);
        }
        principal.last_login_time = Some(now);
        let token = JWT_KEYS.generate_token(principal.id, kind).map_err(|err| {
            tracing::error!("Unable to sign token for {kind} {}: {:?}", principal.id, err);
            invalid()
        })?;
        Ok(VerifiedLogin {
            token,
            user: PrincipalProfile::from(&principal),
        })
    }

    async fn discard(&self, kind: PrincipalKind, email: &str) {
        if let Err(err) = self.store.remove(kind, email).await {
            tracing::error!("otp store delete failed: {:?}", err);
        }
    }

    /// Drop every expired entry, returns the number removed
    pub async fn sweep_expired(&self) -> usize {
        match self.store.sweep(self.clock.now()).await {
            Ok(count) => count,
            Err(err) => {
                tracing::error!("otp sweep failed: {:?}", err);
                0
            }
        }
    }
}
