use axum::async_trait;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use appleverse_backend::{
    models::*,
    otp::OtpNotifier,
    stores::{AdminRequestStore, AppleStore, ImageStore, PrincipalStore},
    utils::get_epoch_ts,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

#[derive(Default)]
pub struct MemoryPrincipals {
    rows: Mutex<HashMap<(PrincipalKind, u32), Principal>>,
    next_id: Mutex<u32>,
}

impl MemoryPrincipals {
    pub fn get(&self, kind: PrincipalKind, id: u32) -> Option<Principal> {
        lock(&self.rows).get(&(kind, id)).cloned()
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipals {
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> anyhow::Result<Option<Principal>> {
        let rows = lock(&self.rows);
        let found = rows
            .iter()
            .find(|((k, _), p)| *k == kind && p.email == email)
            .map(|(_, p)| p.clone());
        Ok(found)
    }

    async fn find_by_id(&self, kind: PrincipalKind, id: u32) -> anyhow::Result<Option<Principal>> {
        Ok(self.get(kind, id))
    }

    async fn insert(&self, kind: PrincipalKind, new: NewPrincipal) -> anyhow::Result<Principal> {
        let id = {
            let mut next_id = lock(&self.next_id);
            *next_id += 1;
            *next_id
        };
        let principal = Principal {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            is_active: true,
            role: new.role,
            dob: new.dob,
            created_ts: Some(get_epoch_ts()),
            approved_by: new.approved_by,
            ..Default::default()
        };
        lock(&self.rows).insert((kind, id), principal.clone());
        Ok(principal)
    }

    async fn touch_last_login(&self, kind: PrincipalKind, id: u32, ts: u64) -> anyhow::Result<()> {
        if let Some(p) = lock(&self.rows).get_mut(&(kind, id)) {
            p.last_login_time = Some(ts);
        }
        Ok(())
    }

    async fn update_password(
        &self,
        kind: PrincipalKind,
        id: u32,
        password_hash: String,
    ) -> anyhow::Result<bool> {
        let mut rows = lock(&self.rows);
        let Some(p) = rows.get_mut(&(kind, id)) else {
            return Ok(false);
        };
        p.password_hash = Some(password_hash);
        Ok(true)
    }

    async fn update_profile(
        &self,
        kind: PrincipalKind,
        id: u32,
        patch: ProfilePatch,
    ) -> anyhow::Result<Option<Principal>> {
        let mut rows = lock(&self.rows);
        let Some(p) = rows.get_mut(&(kind, id)) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            p.name = name;
        }
        if let Some(email) = patch.email {
            p.email = email;
        }
        if let Some(dob) = patch.dob {
            p.dob = Some(dob);
        }
        Ok(Some(p.clone()))
    }

    async fn list(&self, kind: PrincipalKind) -> anyhow::Result<Vec<Principal>> {
        let mut list: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect();
        list.sort_by_key(|p| p.id);
        Ok(list)
    }

    async fn set_active(&self, kind: PrincipalKind, id: u32, active: bool) -> anyhow::Result<bool> {
        let mut rows = lock(&self.rows);
        let Some(p) = rows.get_mut(&(kind, id)) else {
            return Ok(false);
        };
        p.is_active = active;
        Ok(true)
    }

    async fn delete(&self, kind: PrincipalKind, id: u32) -> anyhow::Result<bool> {
        Ok(lock(&self.rows).remove(&(kind, id)).is_some())
    }

    async fn append_activity(
        &self,
        kind: PrincipalKind,
        id: u32,
        entry: ActivityEntry,
    ) -> anyhow::Result<()> {
        if let Some(p) = lock(&self.rows).get_mut(&(kind, id)) {
            p.activity_log.push(entry);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryApples {
    rows: Mutex<Vec<Apple>>,
}

impl MemoryApples {
    pub fn all(&self) -> Vec<Apple> {
        lock(&self.rows).clone()
    }
}

#[async_trait]
impl AppleStore for MemoryApples {
    async fn insert(&self, new: NewApple) -> anyhow::Result<Apple> {
        let mut rows = lock(&self.rows);
        let now = get_epoch_ts();
        let apple = Apple {
            id: rows.len() as u32 + 1,
            cultivar_name: new.cultivar_name,
            details: new.details,
            images: new.images,
            status: AppleStatus::Active,
            created_by: new.created_by,
            created_ts: now,
            updated_ts: now,
        };
        rows.push(apple.clone());
        Ok(apple)
    }

    async fn list(&self) -> anyhow::Result<Vec<Apple>> {
        Ok(lock(&self.rows).iter().rev().cloned().collect())
    }

    async fn get(&self, id: u32) -> anyhow::Result<Option<Apple>> {
        Ok(lock(&self.rows).iter().find(|a| a.id == id).cloned())
    }

    async fn search(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Apple>> {
        let query = query.to_lowercase();
        let found = lock(&self.rows)
            .iter()
            .filter(|a| {
                [&a.cultivar_name, &a.details.description, &a.details.color, &a.details.taste]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(found)
    }

    async fn update(&self, id: u32, patch: ApplePatch) -> anyhow::Result<Option<Apple>> {
        let mut rows = lock(&self.rows);
        let Some(apple) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.cultivar_name {
            apple.cultivar_name = name;
        }
        if let Some(details) = patch.details {
            apple.details = details.with_defaults();
        }
        if let Some(images) = patch.images {
            apple.images = images;
        }
        if let Some(status) = patch.status {
            apple.status = status;
        }
        Ok(Some(apple.clone()))
    }

    async fn delete(&self, id: u32) -> anyhow::Result<bool> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryAdminRequests {
    pending: Mutex<Vec<AdminRequest>>,
    rejected: Mutex<Vec<AdminRequest>>,
    next_id: Mutex<u32>,
}

fn take(list: &Mutex<Vec<AdminRequest>>, id: u32) -> Option<AdminRequest> {
    let mut list = lock(list);
    let pos = list.iter().position(|r| r.id == id)?;
    Some(list.remove(pos))
}

#[async_trait]
impl AdminRequestStore for MemoryAdminRequests {
    async fn insert_pending(&self, new: NewAdminRequest) -> anyhow::Result<AdminRequest> {
        let id = {
            let mut next_id = lock(&self.next_id);
            *next_id += 1;
            *next_id
        };
        let request = AdminRequest {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            dob: new.dob,
            reason: new.reason,
            status: RequestStatus::Pending,
            created_at: chrono::Utc::now(),
            rejected_by: None,
            rejected_at: None,
        };
        lock(&self.pending).push(request.clone());
        Ok(request)
    }

    async fn find_pending_by_email(&self, email: &str) -> anyhow::Result<Option<AdminRequest>> {
        Ok(lock(&self.pending).iter().find(|r| r.email == email).cloned())
    }

    async fn list_pending(&self) -> anyhow::Result<Vec<AdminRequest>> {
        Ok(lock(&self.pending).iter().rev().cloned().collect())
    }

    async fn list_rejected(&self) -> anyhow::Result<Vec<AdminRequest>> {
        Ok(lock(&self.rejected).iter().rev().cloned().collect())
    }

    async fn take_pending(&self, id: u32) -> anyhow::Result<Option<AdminRequest>> {
        Ok(take(&self.pending, id))
    }

    async fn take_rejected(&self, id: u32) -> anyhow::Result<Option<AdminRequest>> {
        Ok(take(&self.rejected, id))
    }

    async fn put_pending(&self, request: AdminRequest) -> anyhow::Result<()> {
        lock(&self.pending).push(request);
        Ok(())
    }

    async fn put_rejected(&self, request: AdminRequest) -> anyhow::Result<()> {
        lock(&self.rejected).push(request);
        Ok(())
    }
}

/// Keeps stored images in memory, optionally failing for one file name
#[derive(Default)]
pub struct MemoryImages {
    pub saved: Mutex<Vec<(String, usize)>>,
    pub fail_on: Option<String>,
}

impl MemoryImages {
    pub fn saved(&self) -> Vec<String> {
        lock(&self.saved).iter().map(|(name, _)| name.clone()).collect()
    }
}

#[async_trait]
impl ImageStore for MemoryImages {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        if self.fail_on.as_deref() == Some(file_name) {
            anyhow::bail!("storage rejected {file_name}");
        }
        lock(&self.saved).push((file_name.to_owned(), bytes.len()));
        Ok(format!("/images/{file_name}"))
    }
}

/// Captures every code sent so tests can log in with it
#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(PrincipalKind, String, String)>>,
}

impl CapturingNotifier {
    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }

    /// Wait for the latest code sent to the email, delivery runs in the background
    pub async fn wait_for_code(&self, kind: PrincipalKind, email: &str, nth: usize) -> String {
        for _ in 0..100 {
            {
                let sent = lock(&self.sent);
                let codes: Vec<_> = sent
                    .iter()
                    .filter(|(k, e, _)| *k == kind && e == email)
                    .map(|(_, _, code)| code.clone())
                    .collect();
                if codes.len() >= nth {
                    return codes[nth - 1].clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no code number {nth} was sent to {email}");
    }
}

#[async_trait]
impl OtpNotifier for CapturingNotifier {
    async fn send_code(&self, kind: PrincipalKind, email: &str, code: &str) -> anyhow::Result<()> {
        lock(&self.sent).push((kind, email.to_owned(), code.to_owned()));
        Ok(())
    }
}
