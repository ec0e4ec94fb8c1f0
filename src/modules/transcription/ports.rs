use async_trait::async_trait;
use bytes::Bytes;

/// Everything the job service needs to start one transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    pub name: String,
    pub media_uri: String,
    pub output_bucket: String,
    pub output_key: String,
    pub media_format: String,
    pub language_code: String,
}

#[async_trait]
pub trait JobService: Send + Sync {
    async fn start(&self, submission: &JobSubmission) -> Result<(), JobServiceError>;

    /// Returns the job's status text, e.g. `IN_PROGRESS`.
    async fn get_status(&self, name: &str) -> Result<String, JobServiceError>;

    async fn delete(&self, name: &str) -> Result<(), JobServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobServiceError {
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl JobServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JobServiceError::NotFound(_))
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError>;

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), ObjectStoreError>;

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("failed to read object body: {0}")]
    Body(String),
}
