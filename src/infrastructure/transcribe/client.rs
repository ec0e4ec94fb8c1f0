use async_trait::async_trait;
use aws_sdk_transcribe::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_transcribe::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_transcribe::types::{LanguageCode, Media, MediaFormat};
use aws_sdk_transcribe::Client;
use tracing::info;

use crate::modules::transcription::ports::{JobService, JobServiceError, JobSubmission};

/// Amazon Transcribe batch jobs.
#[derive(Clone)]
pub struct TranscribeService {
    client: Client,
}

impl TranscribeService {
    pub async fn new(region: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        let client = Client::from_conf(config);

        info!(region, "✅ Transcribe client ready");

        Self { client }
    }
}

fn classify<E, R>(err: SdkError<E, R>) -> JobServiceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let reason = DisplayErrorContext(&err).to_string();
    classify_code(err.code(), reason)
}

fn classify_code(code: Option<&str>, reason: String) -> JobServiceError {
    match code {
        Some("NotFoundException") => JobServiceError::NotFound(reason),
        // Unknown job names come back as a bad request on some operations.
        Some("BadRequestException") if reason.contains("couldn't be found") => {
            JobServiceError::NotFound(reason)
        }
        Some(_) => JobServiceError::Rejected(reason),
        None => JobServiceError::Transport(reason),
    }
}

#[async_trait]
impl JobService for TranscribeService {
    async fn start(&self, submission: &JobSubmission) -> Result<(), JobServiceError> {
        let media = Media::builder()
            .media_file_uri(&submission.media_uri)
            .build();

        self.client
            .start_transcription_job()
            .transcription_job_name(&submission.name)
            .media(media)
            .media_format(MediaFormat::from(submission.media_format.as_str()))
            .language_code(LanguageCode::from(submission.language_code.as_str()))
            .output_bucket_name(&submission.output_bucket)
            .output_key(&submission.output_key)
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn get_status(&self, name: &str) -> Result<String, JobServiceError> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(name)
            .send()
            .await
            .map_err(classify)?;

        output
            .transcription_job()
            .and_then(|job| job.transcription_job_status())
            .map(|status| status.as_str().to_string())
            .ok_or_else(|| JobServiceError::Rejected(format!("no status returned for {}", name)))
    }

    async fn delete(&self, name: &str) -> Result<(), JobServiceError> {
        self.client
            .delete_transcription_job()
            .transcription_job_name(name)
            .send()
            .await
            .map_err(classify)?;

        Ok(())
    }
}
