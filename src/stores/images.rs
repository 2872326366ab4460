use axum::async_trait;
use std::path::PathBuf;

use super::ImageStore;
use crate::{constants::*, utils::uniq_file_name};

/// Writes images under a local directory which the router serves at `/images`
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env() -> Self {
        let dir = std::env::var("IMAGE_DIR").unwrap_or(DEFAULT_IMAGE_DIR.to_owned());
        Self::new(dir)
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = uniq_file_name(file_name);
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        tracing::debug!("Stored image {file_name} as {name}");
        Ok(format!("{IMAGE_URL_PREFIX}/{name}"))
    }
}

/// Uploads images to an S3 bucket and returns the object url
pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3ImageStore {
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&config);
        let bucket = std::env::var("AWS_BUCKET").unwrap_or(AWS_BUCKET.to_owned());
        let region = std::env::var("AWS_REGION").unwrap_or(AWS_REGION.to_owned());
        Self {
            client,
            bucket,
            region,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key)
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        let key = uniq_file_name(file_name);
        let resp = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(bytes.into())
            .send()
            .await?;
        tracing::debug!("{:?}", resp);
        Ok(self.object_url(&key))
    }
}
