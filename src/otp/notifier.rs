use axum::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

use crate::{constants::*, models::PrincipalKind};

/// Delivers a freshly issued login code to its owner
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    async fn send_code(&self, kind: PrincipalKind, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Development notifier, writes the code to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn send_code(&self, kind: PrincipalKind, email: &str, code: &str) -> anyhow::Result<()> {
        tracing::debug!("Send {kind} login code {code} to {email}");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Posts the code to a transactional mail HTTP API
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
    code_ttl_secs: u64,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: String, from: String, code_ttl_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
            code_ttl_secs,
        }
    }

    /// Returns `None` when `MAIL_API_URL` is not configured
    pub fn from_env(code_ttl_secs: u64) -> Option<Self> {
        let endpoint = std::env::var("MAIL_API_URL").ok()?;
        let api_key = std::env::var("MAIL_API_KEY").unwrap_or_default();
        let from = std::env::var("MAIL_FROM").unwrap_or("no-reply@appleverse.local".to_owned());
        Some(Self::new(endpoint, api_key, from, code_ttl_secs))
    }
}

fn mail_text(kind: PrincipalKind, code: &str, ttl_secs: u64) -> String {
    let lifetime = if ttl_secs % 60 == 0 {
        format!("{} minutes", ttl_secs / 60)
    } else {
        format!("{ttl_secs} seconds")
    };
    format!("Your {kind} login code is {code}. It expires in {lifetime}.")
}

#[async_trait]
impl OtpNotifier for HttpMailer {
    async fn send_code(&self, kind: PrincipalKind, email: &str, code: &str) -> anyhow::Result<()> {
        let payload = MailPayload {
            from: &self.from,
            to: email,
            subject: OTP_MAIL_SUBJECT,
            text: mail_text(kind, code, self.code_ttl_secs),
        };
        let bearer_token = format!("Bearer {}", self.api_key);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_token.as_str().parse()?);
        headers.insert(CONTENT_TYPE, "application/json".parse()?);
        let res = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&payload)
            .send()
            .await?;
        if !res.status().is_success() {
            anyhow::bail!("mail api responded with {}", res.status());
        }
        Ok(())
    }
}
