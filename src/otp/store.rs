use axum::async_trait;
use std::{collections::HashMap, sync::RwLock};

use super::OtpEntry;
use crate::models::PrincipalKind;

/// Key-value storage for outstanding login codes, keyed by principal kind and
/// normalized email. Implementations must treat removal of an absent key as a
/// no-op.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn get(&self, kind: PrincipalKind, email: &str) -> anyhow::Result<Option<OtpEntry>>;

    /// Insert or replace the entry
    async fn put(&self, kind: PrincipalKind, email: &str, entry: OtpEntry) -> anyhow::Result<()>;

    /// Count a failed attempt, only if the entry still holds `hashed_code`
    async fn record_failed_attempt(
        &self,
        kind: PrincipalKind,
        email: &str,
        hashed_code: &str,
    ) -> anyhow::Result<()>;

    /// Remove and return the entry if it still holds `hashed_code`.
    /// At most one caller can consume a given entry.
    async fn consume(
        &self,
        kind: PrincipalKind,
        email: &str,
        hashed_code: &str,
    ) -> anyhow::Result<Option<OtpEntry>>;

    async fn remove(&self, kind: PrincipalKind, email: &str) -> anyhow::Result<()>;

    /// Drop every entry with `now > expires_at`, returns how many were removed
    async fn sweep(&self, now: u64) -> anyhow::Result<usize>;
}

type OtpKey = (PrincipalKind, String);

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryOtpStore {
    entries: RwLock<HashMap<OtpKey, OtpEntry>>,
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("otp store lock poisoned")
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn get(&self, kind: PrincipalKind, email: &str) -> anyhow::Result<Option<OtpEntry>> {
        let map = self.entries.read().map_err(poisoned)?;
        Ok(map.get(&(kind, email.to_owned())).cloned())
    }

    async fn put(&self, kind: PrincipalKind, email: &str, entry: OtpEntry) -> anyhow::Result<()> {
        let mut map = self.entries.write().map_err(poisoned)?;
        map.insert((kind, email.to_owned()), entry);
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        kind: PrincipalKind,
        email: &str,
        hashed_code: &str,
    ) -> anyhow::Result<()> {
        let mut map = self.entries.write().map_err(poisoned)?;
        if let Some(entry) = map.get_mut(&(kind, email.to_owned())) {
            if entry.hashed_code == hashed_code {
                entry.attempts += 1;
            }
        }
        Ok(())
    }

    async fn consume(
        &self,
        kind: PrincipalKind,
        email: &str,
        hashed_code: &str,
    ) -> anyhow::Result<Option<OtpEntry>> {
        let mut map = self.entries.write().map_err(poisoned)?;
        let key = (kind, email.to_owned());
        match map.get(&key) {
            Some(entry) if entry.hashed_code == hashed_code => Ok(map.remove(&key)),
            _ => Ok(None),
        }
    }

    async fn remove(&self, kind: PrincipalKind, email: &str) -> anyhow::Result<()> {
        let mut map = self.entries.write().map_err(poisoned)?;
        map.remove(&(kind, email.to_owned()));
        Ok(())
    }

    async fn sweep(&self, now: u64) -> anyhow::Result<usize> {
        let mut map = self.entries.write().map_err(poisoned)?;
        let before = map.len();
        map.retain(|_, entry| !entry.is_expired(now));
        Ok(before - map.len())
    }
}
