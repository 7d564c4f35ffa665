//! Supabase Storage over its REST API.

use async_trait::async_trait;
use seekr_core::types::DbId;

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::providers::{ensure_success, missing_api_key};
use crate::storage::StorageAdapter;

const DEFAULT_BUCKET: &str = "uploads";

pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn from_config(config: AdapterConfig) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("supabase"))?;
        let base_url = config.base_url.ok_or_else(|| {
            AdapterError::InvalidInput("supabase requires a base_url (the project URL)".into())
        })?;
        let bucket = config
            .extra
            .get("bucket")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_BUCKET)
            .to_string();
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

#[async_trait]
impl StorageAdapter for SupabaseStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        owner: DbId,
        folder: &str,
    ) -> Result<String, AdapterError> {
        let key = format!("{folder}/{owner}/{}", uuid::Uuid::new_v4());
        let response = self
            .client
            .post(self.object_url(&key))
            .bearer_auth(&self.api_key)
            .body(bytes)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(key)
    }

    fn get_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }

    async fn delete(&self, key: &str) -> Result<bool, AdapterError> {
        let response = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::from_config(
            AdapterConfig::new()
                .with_api_key("service-key")
                .with_base_url("https://proj.supabase.co/"),
        )
        .unwrap()
    }

    #[test]
    fn public_url_includes_bucket_and_key() {
        assert_eq!(
            storage().get_url("avatars/7/abc"),
            "https://proj.supabase.co/storage/v1/object/public/uploads/avatars/7/abc"
        );
    }

    #[test]
    fn bucket_is_overridable_through_extra() {
        let mut config = AdapterConfig::new()
            .with_api_key("k")
            .with_base_url("https://proj.supabase.co");
        config.extra.insert("bucket".into(), "media".into());
        let storage = SupabaseStorage::from_config(config).unwrap();
        assert!(storage.get_url("x").contains("/media/"));
    }
}
