use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppError;

/// Object storage holding uploaded media, organised in buckets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `bytes` at `path` inside `bucket` and returns the stored path.
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), AppError>;
}

#[async_trait]
impl<T: BlobStorage + ?Sized> BlobStorage for Arc<T> {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        (**self).upload(bucket, path, bytes, content_type).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        (**self).public_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), AppError> {
        (**self).remove(bucket, paths).await
    }
}
