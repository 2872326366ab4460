//! Persistence seams. Handlers and services only see these traits so the
//! backing database and the image destination can be swapped.

use axum::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    ActivityEntry, AdminRequest, Apple, ApplePatch, NewAdminRequest, NewApple, NewPrincipal,
    Principal, PrincipalKind, ProfilePatch,
};

pub mod images;
pub mod mongo;

pub use images::{LocalImageStore, S3ImageStore};
pub use mongo::{MongoAdminRequestStore, MongoAppleStore, MongoPrincipalStore};

/// Directory of users and admins, partitioned by kind
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> anyhow::Result<Option<Principal>>;

    async fn find_by_id(&self, kind: PrincipalKind, id: u32) -> anyhow::Result<Option<Principal>>;

    async fn insert(&self, kind: PrincipalKind, new: NewPrincipal) -> anyhow::Result<Principal>;

    async fn touch_last_login(&self, kind: PrincipalKind, id: u32, ts: u64) -> anyhow::Result<()>;

    async fn update_password(
        &self,
        kind: PrincipalKind,
        id: u32,
        password_hash: String,
    ) -> anyhow::Result<bool>;

    /// Write the fields present in `patch`, `None` when no such principal
    async fn update_profile(
        &self,
        kind: PrincipalKind,
        id: u32,
        patch: ProfilePatch,
    ) -> anyhow::Result<Option<Principal>>;

    async fn list(&self, kind: PrincipalKind) -> anyhow::Result<Vec<Principal>>;

    async fn set_active(&self, kind: PrincipalKind, id: u32, active: bool)
        -> anyhow::Result<bool>;

    async fn delete(&self, kind: PrincipalKind, id: u32) -> anyhow::Result<bool>;

    async fn append_activity(
        &self,
        kind: PrincipalKind,
        id: u32,
        entry: ActivityEntry,
    ) -> anyhow::Result<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppleStore: Send + Sync {
    async fn insert(&self, new: NewApple) -> anyhow::Result<Apple>;

    /// Newest first
    async fn list(&self) -> anyhow::Result<Vec<Apple>>;

    async fn get(&self, id: u32) -> anyhow::Result<Option<Apple>>;

    /// Case-insensitive substring search over name, description, color and taste
    async fn search(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Apple>>;

    async fn update(&self, id: u32, patch: ApplePatch) -> anyhow::Result<Option<Apple>>;

    async fn delete(&self, id: u32) -> anyhow::Result<bool>;
}

/// Pending and rejected admin signup requests
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdminRequestStore: Send + Sync {
    async fn insert_pending(&self, new: NewAdminRequest) -> anyhow::Result<AdminRequest>;

    async fn find_pending_by_email(&self, email: &str) -> anyhow::Result<Option<AdminRequest>>;

    async fn list_pending(&self) -> anyhow::Result<Vec<AdminRequest>>;

    async fn list_rejected(&self) -> anyhow::Result<Vec<AdminRequest>>;

    /// Remove and return a pending request
    async fn take_pending(&self, id: u32) -> anyhow::Result<Option<AdminRequest>>;

    /// Remove and return a rejected request
    async fn take_rejected(&self, id: u32) -> anyhow::Result<Option<AdminRequest>>;

    async fn put_pending(&self, request: AdminRequest) -> anyhow::Result<()>;

    async fn put_rejected(&self, request: AdminRequest) -> anyhow::Result<()>;
}

/// Destination for uploaded images
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the bytes and return the public path of the stored image
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<String>;
}
