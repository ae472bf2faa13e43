use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::json;

use crate::errors::AppError;
use crate::repositories::storage::BlobStorage;

/// Supabase storage over its REST API, authenticated with the service key.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        SupabaseStorage {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    async fn fail(action: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%status, %body, "Storage {action} failed");
        AppError::StorageError(format!("{action} failed with status {status}"))
    }
}

#[async_trait]
impl BlobStorage for SupabaseStorage {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.service_key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::fail("upload", response).await);
        }
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), AppError> {
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{bucket}", self.base_url))
            .bearer_auth(&self.service_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::fail("delete", response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_urls_use_the_public_object_route() {
        let storage = SupabaseStorage::new("https://xyz.supabase.co/", "key");
        assert_eq!(
            storage.public_url("project-media", "1700000000000-ab12.png"),
            "https://xyz.supabase.co/storage/v1/object/public/project-media/1700000000000-ab12.png"
        );
    }
}
