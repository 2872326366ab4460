use crate::constants::*;
use anyhow::Context;
use futures::stream::TryStreamExt;
use mongodb::bson::Document;
use mongodb::error::Result as MongoResult;
use mongodb::options::{
    DeleteOptions, FindOneAndDeleteOptions, FindOneAndUpdateOptions, FindOneOptions, FindOptions,
    InsertOneOptions, UpdateOptions,
};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use mongodb::{options::ClientOptions, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Thin wrapper over the MongoDB client used by every store
pub struct AppDatabase(Client);

impl AppDatabase {
    /// Connect with the pool settings found in the environment.
    /// `MONGODB_URI` is required.
    pub async fn new() -> anyhow::Result<Self> {
        let uri = std::env::var("MONGODB_URI").context("MONGODB_URI is not set")?;
        let min_pool = std::env::var("MONGODB_MIN_POOL_SIZE")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(MONGO_MIN_POOL_SIZE);
        let max_pool = std::env::var("MONGODB_MAX_POOL_SIZE")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(MONGO_MAX_POOL_SIZE);
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(DB_NAME.to_owned());
        options.max_pool_size = Some(max_pool);
        options.min_pool_size = Some(min_pool);
        options.connect_timeout = Some(Duration::from_secs(MONGO_CONN_TIMEOUT));
        let client = Client::with_options(options)?;
        Ok(Self(client))
    }

    pub async fn find_one<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOneOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one(filter, options).await
    }

    pub async fn find<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOptions>,
    ) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find(filter, options).await?.try_collect().await
    }

    pub async fn insert_one<T>(
        &self,
        db: &str,
        coll: &str,
        doc: &T,
        options: Option<InsertOneOptions>,
    ) -> MongoResult<InsertOneResult>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.insert_one(doc, options).await
    }

    pub async fn update_one(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> MongoResult<UpdateResult> {
        let coll = self.0.database(db).collection::<Document>(coll);
        coll.update_one(filter, update, options).await
    }

    pub async fn find_one_and_update<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<FindOneAndUpdateOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one_and_update(filter, update, options).await
    }

    pub async fn find_one_and_delete<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        options: Option<FindOneAndDeleteOptions>,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        coll.find_one_and_delete(filter, options).await
    }

    pub async fn delete_one(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        options: Option<DeleteOptions>,
    ) -> MongoResult<DeleteResult> {
        let coll = self.0.database(db).collection::<Document>(coll);
        coll.delete_one(filter, options).await
    }
}
