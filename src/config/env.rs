use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    AwsRegion,
    AwsAccessKey,
    AwsSecretKey,
    S3Bucket,
    S3Endpoint,
    LanguageCode,
    MediaFormat,
    BatchMaxInFlight,
    DeleteRetryInitialDelayMs,
    DeleteRetryMaxDelayMs,
    DeleteRetryMaxAttempts,
    DeleteRetryNotFound,
    PresignTtlSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::AwsRegion => "S3_REGION",
            EnvKey::AwsAccessKey => "S3_ACCESSKEY",
            EnvKey::AwsSecretKey => "S3_PRIVATEDID",
            EnvKey::S3Bucket => "S3_BUCKET_NAME",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::LanguageCode => "TRANSCRIBE_LANGUAGE_CODE",
            EnvKey::MediaFormat => "TRANSCRIBE_MEDIA_FORMAT",
            EnvKey::BatchMaxInFlight => "BATCH_MAX_IN_FLIGHT",
            EnvKey::DeleteRetryInitialDelayMs => "DELETE_RETRY_INITIAL_DELAY_MS",
            EnvKey::DeleteRetryMaxDelayMs => "DELETE_RETRY_MAX_DELAY_MS",
            EnvKey::DeleteRetryMaxAttempts => "DELETE_RETRY_MAX_ATTEMPTS",
            EnvKey::DeleteRetryNotFound => "DELETE_RETRY_NOT_FOUND",
            EnvKey::PresignTtlSecs => "PRESIGN_TTL_SECS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
