use serde::Deserialize;
use std::time::Duration;
use crate::config::env::{self, EnvKey};
use crate::modules::transcription::retry::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub aws_region: String,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    pub language_code: String,
    pub media_format: String,
    pub batch_max_in_flight: usize,
    pub delete_retry_initial_delay_ms: u64,
    pub delete_retry_max_delay_ms: u64,
    /// `0` keeps retrying forever.
    pub delete_retry_max_attempts: u32,
    pub delete_retry_not_found: bool,
    pub presign_ttl_secs: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            aws_region: required(EnvKey::AwsRegion)?,
            aws_access_key: required(EnvKey::AwsAccessKey)?,
            aws_secret_key: required(EnvKey::AwsSecretKey)?,
            s3_bucket: required(EnvKey::S3Bucket)?,
            s3_endpoint: env::get_opt(EnvKey::S3Endpoint),
            language_code: env::get_or(EnvKey::LanguageCode, "ko-KR"),
            media_format: env::get_or(EnvKey::MediaFormat, "wav"),
            batch_max_in_flight: env::get_parsed(EnvKey::BatchMaxInFlight, 16),
            delete_retry_initial_delay_ms: env::get_parsed(EnvKey::DeleteRetryInitialDelayMs, 3000),
            delete_retry_max_delay_ms: env::get_parsed(EnvKey::DeleteRetryMaxDelayMs, 60_000),
            delete_retry_max_attempts: env::get_parsed(EnvKey::DeleteRetryMaxAttempts, 10),
            delete_retry_not_found: env::get_parsed(EnvKey::DeleteRetryNotFound, false),
            presign_ttl_secs: env::get_parsed(EnvKey::PresignTtlSecs, 60 * 30),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.delete_retry_initial_delay_ms),
            max_delay: Duration::from_millis(self.delete_retry_max_delay_ms),
            multiplier: 2,
            max_attempts: (self.delete_retry_max_attempts > 0).then_some(self.delete_retry_max_attempts),
            retry_not_found: self.delete_retry_not_found,
        }
    }

    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }
}

/// Needed before the rest of the config so the server can bind even when the
/// AWS settings are missing.
pub fn server_port() -> u16 {
    env::get_parsed(EnvKey::ServerPort, 8080)
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get_opt(key).ok_or(ConfigError::Missing(name))
}
