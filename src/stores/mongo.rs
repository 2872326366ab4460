use axum::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, to_bson, to_document, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
};
use std::sync::Arc;

use super::{AdminRequestStore, AppleStore, PrincipalStore};
use crate::{
    constants::*,
    database::AppDatabase,
    models::*,
    utils::{get_epoch_ts, next_id},
};

fn principal_coll(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::User => COLL_USERS,
        PrincipalKind::Admin => COLL_ADMINS,
    }
}

fn principal_seq(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::User => USER_ID_SEQ,
        PrincipalKind::Admin => ADMIN_ID_SEQ,
    }
}

fn newest_first(field: &str) -> Option<FindOptions> {
    let options = FindOptions::builder().sort(doc! {field: -1}).build();
    Some(options)
}

pub struct MongoPrincipalStore {
    db: Arc<AppDatabase>,
}

impl MongoPrincipalStore {
    pub fn new(db: Arc<AppDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalStore for MongoPrincipalStore {
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> anyhow::Result<Option<Principal>> {
        let filter = Some(doc! {"email": email});
        let principal = self
            .db
            .find_one::<Principal>(DB_NAME, principal_coll(kind), filter, None)
            .await?;
        Ok(principal)
    }

    async fn find_by_id(&self, kind: PrincipalKind, id: u32) -> anyhow::Result<Option<Principal>> {
        let filter = Some(doc! {"id": id});
        let principal = self
            .db
            .find_one::<Principal>(DB_NAME, principal_coll(kind), filter, None)
            .await?;
        Ok(principal)
    }

    async fn insert(&self, kind: PrincipalKind, new: NewPrincipal) -> anyhow::Result<Principal> {
        let id = next_id(principal_seq(kind), &self.db).await?;
        let principal = Principal {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            is_active: true,
            role: new.role,
            dob: new.dob,
            last_login_time: None,
            created_ts: Some(get_epoch_ts()),
            approved_by: new.approved_by,
            activity_log: vec![],
        };
        self.db
            .insert_one::<Principal>(DB_NAME, principal_coll(kind), &principal, None)
            .await?;
        tracing::debug!("Created {kind} with id {id}");
        Ok(principal)
    }

    async fn touch_last_login(&self, kind: PrincipalKind, id: u32, ts: u64) -> anyhow::Result<()> {
        let filter = doc! {"id": id};
        let update = doc! {"$set": {"lastLoginTime": ts as i64}};
        self.db
            .update_one(DB_NAME, principal_coll(kind), filter, update, None)
            .await?;
        Ok(())
    }

    async fn update_password(
        &self,
        kind: PrincipalKind,
        id: u32,
        password_hash: String,
    ) -> anyhow::Result<bool> {
        let filter = doc! {"id": id};
        let update = doc! {"$set": {"passwordHash": password_hash}};
        let result = self
            .db
            .update_one(DB_NAME, principal_coll(kind), filter, update, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn update_profile(
        &self,
        kind: PrincipalKind,
        id: u32,
        patch: ProfilePatch,
    ) -> anyhow::Result<Option<Principal>> {
        let mut set = Document::new();
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(email) = patch.email {
            set.insert("email", email);
        }
        if let Some(dob) = patch.dob {
            set.insert("dob", dob);
        }
        let filter = doc! {"id": id};
        let update = doc! {"$set": set};
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let principal = self
            .db
            .find_one_and_update::<Principal>(
                DB_NAME,
                principal_coll(kind),
                filter,
                update,
                Some(options),
            )
            .await?;
        Ok(principal)
    }

    async fn list(&self, kind: PrincipalKind) -> anyhow::Result<Vec<Principal>> {
        let principals = self
            .db
            .find::<Principal>(DB_NAME, principal_coll(kind), None, newest_first("createdTs"))
            .await?;
        Ok(principals)
    }

    async fn set_active(
        &self,
        kind: PrincipalKind,
        id: u32,
        active: bool,
    ) -> anyhow::Result<bool> {
        let filter = doc! {"id": id};
        let update = doc! {"$set": {"isActive": active}};
        let result = self
            .db
            .update_one(DB_NAME, principal_coll(kind), filter, update, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, kind: PrincipalKind, id: u32) -> anyhow::Result<bool> {
        let filter = doc! {"id": id};
        let result = self
            .db
            .delete_one(DB_NAME, principal_coll(kind), filter, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn append_activity(
        &self,
        kind: PrincipalKind,
        id: u32,
        entry: ActivityEntry,
    ) -> anyhow::Result<()> {
        let filter = doc! {"id": id};
        // keep only the most recent entries
        let update = doc! {
            "$push": {
                "activityLog": {
                    "$each": [to_bson(&entry)?],
                    "$slice": -ACTIVITY_LOG_LIMIT,
                }
            }
        };
        self.db
            .update_one(DB_NAME, principal_coll(kind), filter, update, None)
            .await?;
        Ok(())
    }
}

pub struct MongoAppleStore {
    db: Arc<AppDatabase>,
}

impl MongoAppleStore {
    pub fn new(db: Arc<AppDatabase>) -> Self {
        Self { db }
    }
}

/// Case-insensitive regex filter over the searchable apple fields
fn search_filter(query: &str) -> Document {
    let pattern = regex::escape(query.trim());
    let fields = ["cultivarName", "description", "color", "taste"];
    let clauses = fields
        .iter()
        .map(|field| doc! {*field: {"$regex": pattern.as_str(), "$options": "i"}})
        .collect::<Vec<_>>();
    doc! {"$or": clauses}
}

#[async_trait]
impl AppleStore for MongoAppleStore {
    async fn insert(&self, new: NewApple) -> anyhow::Result<Apple> {
        let id = next_id(APPLE_ID_SEQ, &self.db).await?;
        let ts = get_epoch_ts();
        let apple = Apple {
            id,
            cultivar_name: new.cultivar_name,
            details: new.details.with_defaults(),
            images: new.images,
            status: AppleStatus::Active,
            created_by: new.created_by,
            created_ts: ts,
            updated_ts: ts,
        };
        self.db
            .insert_one::<Apple>(DB_NAME, COLL_APPLES, &apple, None)
            .await?;
        Ok(apple)
    }

    async fn list(&self) -> anyhow::Result<Vec<Apple>> {
        let apples = self
            .db
            .find::<Apple>(DB_NAME, COLL_APPLES, None, newest_first("createdTs"))
            .await?;
        Ok(apples)
    }

    async fn get(&self, id: u32) -> anyhow::Result<Option<Apple>> {
        let filter = Some(doc! {"id": id});
        let apple = self
            .db
            .find_one::<Apple>(DB_NAME, COLL_APPLES, filter, None)
            .await?;
        Ok(apple)
    }

    async fn search(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Apple>> {
        let filter = Some(search_filter(query));
        let options = FindOptions::builder().limit(limit).build();
        let apples = self
            .db
            .find::<Apple>(DB_NAME, COLL_APPLES, filter, Some(options))
            .await?;
        Ok(apples)
    }

    async fn update(&self, id: u32, patch: ApplePatch) -> anyhow::Result<Option<Apple>> {
        let mut set = doc! {"updatedTs": get_epoch_ts() as i64};
        if let Some(name) = patch.cultivar_name {
            set.insert("cultivarName", name);
        }
        if let Some(details) = patch.details {
            set.extend(to_document(&details.with_defaults())?);
        }
        if let Some(images) = patch.images {
            set.insert("images", images);
        }
        if let Some(status) = patch.status {
            set.insert("status", to_bson(&status)?);
        }
        let filter = doc! {"id": id};
        let update = doc! {"$set": set};
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let apple = self
            .db
            .find_one_and_update::<Apple>(DB_NAME, COLL_APPLES, filter, update, Some(options))
            .await?;
        Ok(apple)
    }

    async fn delete(&self, id: u32) -> anyhow::Result<bool> {
        let filter = doc! {"id": id};
        let result = self
            .db
            .delete_one(DB_NAME, COLL_APPLES, filter, None)
            .await?;
        Ok(result.deleted_count > 0)
    }
}

pub struct MongoAdminRequestStore {
    db: Arc<AppDatabase>,
}

impl MongoAdminRequestStore {
    pub fn new(db: Arc<AppDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminRequestStore for MongoAdminRequestStore {
    async fn insert_pending(&self, new: NewAdminRequest) -> anyhow::Result<AdminRequest> {
        let id = next_id(REQUEST_ID_SEQ, &self.db).await?;
        let request = AdminRequest {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            dob: new.dob,
            reason: new.reason,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            rejected_by: None,
            rejected_at: None,
        };
        self.put_pending(request.clone()).await?;
        Ok(request)
    }

    async fn find_pending_by_email(&self, email: &str) -> anyhow::Result<Option<AdminRequest>> {
        let filter = Some(doc! {"email": email});
        let request = self
            .db
            .find_one::<AdminRequest>(DB_NAME, COLL_PENDING_REQUESTS, filter, None)
            .await?;
        Ok(request)
    }

    async fn list_pending(&self) -> anyhow::Result<Vec<AdminRequest>> {
        let requests = self
            .db
            .find::<AdminRequest>(DB_NAME, COLL_PENDING_REQUESTS, None, newest_first("createdAt"))
            .await?;
        Ok(requests)
    }

    async fn list_rejected(&self) -> anyhow::Result<Vec<AdminRequest>> {
        let requests = self
            .db
            .find::<AdminRequest>(DB_NAME, COLL_REJECTED_REQUESTS, None, newest_first("rejectedAt"))
            .await?;
        Ok(requests)
    }

    async fn take_pending(&self, id: u32) -> anyhow::Result<Option<AdminRequest>> {
        let filter = doc! {"id": id};
        let request = self
            .db
            .find_one_and_delete::<AdminRequest>(DB_NAME, COLL_PENDING_REQUESTS, filter, None)
            .await?;
        Ok(request)
    }

    async fn take_rejected(&self, id: u32) -> anyhow::Result<Option<AdminRequest>> {
        let filter = doc! {"id": id};
        let request = self
            .db
            .find_one_and_delete::<AdminRequest>(DB_NAME, COLL_REJECTED_REQUESTS, filter, None)
            .await?;
        Ok(request)
    }

    async fn put_pending(&self, request: AdminRequest) -> anyhow::Result<()> {
        self.db
            .insert_one::<AdminRequest>(DB_NAME, COLL_PENDING_REQUESTS, &request, None)
            .await?;
        Ok(())
    }

    async fn put_rejected(&self, request: AdminRequest) -> anyhow::Result<()> {
        self.db
            .insert_one::<AdminRequest>(DB_NAME, COLL_REJECTED_REQUESTS, &request, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_escapes_query() {
        let filter = search_filter(" Gala (red) ");
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 4);
        let first = clauses[0].as_document().unwrap();
        let name = first.get_document("cultivarName").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"Gala \(red\)");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_principal_collections() {
        assert_eq!(principal_coll(PrincipalKind::User), COLL_USERS);
        assert_eq!(principal_coll(PrincipalKind::Admin), COLL_ADMINS);
        assert_eq!(principal_seq(PrincipalKind::Admin), ADMIN_ID_SEQ);
    }
}
