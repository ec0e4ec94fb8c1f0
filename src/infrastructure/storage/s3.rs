use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use std::time::Duration;
use tracing::info;

use crate::modules::transcription::ports::{ObjectStore, ObjectStoreError};

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
}

impl StorageService {
    pub async fn new(
        endpoint: Option<&str>,
        region: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let mut config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint {
            // Custom endpoints (MinIO, localstack) only serve path-style URLs.
            config = config.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(config.build());

        info!(bucket, "✅ S3 client ready");

        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    pub async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, ObjectStoreError> {
        let config = presigning(expires_in)?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| request_error(key, e))?;

        Ok(request.uri().to_string())
    }

    pub async fn presign_put(&self, key: &str, expires_in: Duration) -> Result<String, ObjectStoreError> {
        let config = presigning(expires_in)?;
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| request_error(key, e))?;

        Ok(request.uri().to_string())
    }
}

fn presigning(expires_in: Duration) -> Result<PresigningConfig, ObjectStoreError> {
    PresigningConfig::expires_in(expires_in)
        .map_err(|e| ObjectStoreError::Request(format!("invalid presign lifetime: {}", e)))
}

fn request_error<E, R>(key: &str, err: SdkError<E, R>) -> ObjectStoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let reason = format!("{}: {}", key, DisplayErrorContext(&err));
    match err.code() {
        Some("NoSuchKey") | Some("NotFound") => ObjectStoreError::NotFound(reason),
        _ => ObjectStoreError::Request(reason),
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| request_error(key, e))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::Body(format!("{}: {}", key, e)))?;

        Ok(body.into_bytes())
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), ObjectStoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| request_error(key, e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| request_error(key, e))?;

        Ok(())
    }
}
