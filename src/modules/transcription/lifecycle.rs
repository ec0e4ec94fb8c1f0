use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::model::{JobStatus, TranscriptionJob, Track};
use super::naming;
use super::ports::{JobService, JobServiceError, JobSubmission};
use super::retry::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("failed to start transcription job {name}: {source}")]
    Start {
        name: String,
        #[source]
        source: JobServiceError,
    },
    #[error("failed to look up transcription job {name}: {source}")]
    Poll {
        name: String,
        #[source]
        source: JobServiceError,
    },
}

/// How a delete loop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum DeleteOutcome {
    Deleted { name: String, attempts: u32 },
    /// The job service did not know the job; nothing left to delete.
    NotFound { name: String, attempts: u32 },
    GaveUp {
        name: String,
        attempts: u32,
        last_error: String,
    },
}

impl DeleteOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            DeleteOutcome::Deleted { attempts, .. }
            | DeleteOutcome::NotFound { attempts, .. }
            | DeleteOutcome::GaveUp { attempts, .. } => *attempts,
        }
    }

    pub fn is_gone(&self) -> bool {
        !matches!(self, DeleteOutcome::GaveUp { .. })
    }
}

/// Fixed parameters of every job submission.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub bucket: String,
    pub media_format: String,
    pub language_code: String,
}

/// Starts, polls and deletes jobs by their derived names. Holds no per-job
/// state; the job service is the only record of a job.
pub struct TranscriptionJobManager {
    jobs: Arc<dyn JobService>,
    settings: JobSettings,
    retry: RetryPolicy,
}

impl TranscriptionJobManager {
    pub fn new(jobs: Arc<dyn JobService>, settings: JobSettings, retry: RetryPolicy) -> Self {
        Self {
            jobs,
            settings,
            retry,
        }
    }

    pub fn submission(&self, index: usize, track: Track) -> JobSubmission {
        JobSubmission {
            name: naming::job_name(index, track),
            media_uri: naming::media_uri(&self.settings.bucket, index, track),
            output_bucket: self.settings.bucket.clone(),
            output_key: naming::result_key(index, track),
            media_format: self.settings.media_format.clone(),
            language_code: self.settings.language_code.clone(),
        }
    }

    /// Submits the job and returns without waiting for it to finish.
    pub async fn start(&self, index: usize, track: Track) -> Result<TranscriptionJob, LifecycleError> {
        let submission = self.submission(index, track);

        let result = self.jobs.start(&submission).await;
        match result {
            Ok(()) => {
                info!(index, %track, job_name = %submission.name, "transcription started");
                let mut job = TranscriptionJob::new(index, track);
                job.status = JobStatus::InProgress;
                Ok(job)
            }
            Err(e) => {
                warn!(index, %track, job_name = %submission.name, error = %e, "failed to start transcription");
                Err(LifecycleError::Start {
                    name: submission.name,
                    source: e,
                })
            }
        }
    }

    pub async fn poll(&self, index: usize, track: Track) -> Result<TranscriptionJob, LifecycleError> {
        let name = naming::job_name(index, track);

        let result = self.jobs.get_status(&name).await;
        match result {
            Ok(text) => Ok(TranscriptionJob::new(index, track).with_status_text(text)),
            Err(e) => {
                warn!(index, %track, job_name = %name, error = %e, "failed to get transcription status");
                Err(LifecycleError::Poll { name, source: e })
            }
        }
    }

    /// Deletes the job, retrying failed attempts according to the policy.
    pub async fn delete_with_retry(&self, index: usize, track: Track) -> DeleteOutcome {
        let name = naming::job_name(index, track);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let result = self.jobs.delete(&name).await;
            let err = match result {
                Ok(()) => {
                    info!(index, %track, job_name = %name, attempts, "transcription job deleted");
                    return DeleteOutcome::Deleted { name, attempts };
                }
                Err(e) => e,
            };

            if err.is_not_found() && !self.retry.retry_not_found {
                info!(index, %track, job_name = %name, attempts, "transcription job already gone");
                return DeleteOutcome::NotFound { name, attempts };
            }

            if !self.retry.allows_another_attempt(attempts) {
                warn!(index, %track, job_name = %name, attempts, error = %err, "giving up on deleting transcription job");
                return DeleteOutcome::GaveUp {
                    name,
                    attempts,
                    last_error: err.to_string(),
                };
            }

            let delay = self.retry.delay_after(attempts);
            warn!(
                index,
                %track,
                job_name = %name,
                attempt = attempts,
                error = %err,
                retry_in_ms = delay.as_millis() as u64,
                "failed to delete transcription job, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::transcription::test_support::MockJobService;
    use std::time::Duration;
    use tokio::time::Instant;

    fn settings() -> JobSettings {
        JobSettings {
            bucket: "voice-bucket".to_string(),
            media_format: "wav".to_string(),
            language_code: "ko-KR".to_string(),
        }
    }

    fn manager(jobs: Arc<MockJobService>, retry: RetryPolicy) -> TranscriptionJobManager {
        TranscriptionJobManager::new(jobs, settings(), retry)
    }

    #[tokio::test]
    async fn start_submits_derived_identifiers() {
        let jobs = Arc::new(MockJobService::default());
        let manager = manager(jobs.clone(), RetryPolicy::default());

        let job = manager.start(2, Track::Original).await.unwrap();

        assert_eq!(job.name, "job_2_original");
        assert_eq!(job.status, JobStatus::InProgress);
        let started = jobs.started();
        assert_eq!(started.len(), 1);
        assert_eq!(
            started[0],
            JobSubmission {
                name: "job_2_original".to_string(),
                media_uri: "s3://voice-bucket/original/3.wav".to_string(),
                output_bucket: "voice-bucket".to_string(),
                output_key: "stt_original/3.json".to_string(),
                media_format: "wav".to_string(),
                language_code: "ko-KR".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn start_failure_is_reported_not_raised() {
        let jobs = Arc::new(MockJobService::default());
        jobs.reject_starts("ConflictException: job name exists");
        let manager = manager(jobs, RetryPolicy::default());

        let err = manager.start(0, Track::Processed).await.unwrap_err();

        assert!(matches!(err, LifecycleError::Start { ref name, .. } if name == "job_0"));
        assert!(err.to_string().contains("job name exists"));
    }

    #[tokio::test]
    async fn poll_reads_status_of_started_job() {
        let jobs = Arc::new(MockJobService::default());
        let manager = manager(jobs.clone(), RetryPolicy::default());
        manager.start(1, Track::Processed).await.unwrap();
        jobs.set_status("job_1", "COMPLETED");

        let job = manager.poll(1, Track::Processed).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.status_text.as_deref(), Some("COMPLETED"));
    }

    #[tokio::test]
    async fn poll_of_never_started_job_is_an_error_value() {
        let jobs = Arc::new(MockJobService::default());
        let manager = manager(jobs, RetryPolicy::default());

        let err = manager.poll(7, Track::Original).await.unwrap_err();

        match err {
            LifecycleError::Poll { name, source } => {
                assert_eq!(name, "job_7_original");
                assert!(source.is_not_found());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_succeeding_first_time_takes_one_attempt() {
        let jobs = Arc::new(MockJobService::default());
        let manager = manager(jobs.clone(), RetryPolicy::default());

        let outcome = manager.delete_with_retry(0, Track::Processed).await;

        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                name: "job_0".to_string(),
                attempts: 1
            }
        );
        assert_eq!(jobs.delete_attempts("job_0"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_retries_with_delay_until_acknowledged() {
        let jobs = Arc::new(MockJobService::default());
        jobs.fail_deletes("job_3", 2);
        let manager = manager(jobs.clone(), RetryPolicy::unbounded_fixed(Duration::from_secs(3)));

        let started = Instant::now();
        let outcome = manager.delete_with_retry(3, Track::Processed).await;

        assert_eq!(outcome.attempts(), 3);
        assert!(outcome.is_gone());
        assert_eq!(jobs.delete_attempts("job_3"), 3);
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_backs_off_exponentially() {
        let jobs = Arc::new(MockJobService::default());
        jobs.fail_deletes("job_0", 3);
        let manager = manager(jobs.clone(), RetryPolicy::default());

        let started = Instant::now();
        let outcome = manager.delete_with_retry(0, Track::Processed).await;

        assert_eq!(outcome.attempts(), 4);
        // 3s + 6s + 12s
        assert!(started.elapsed() >= Duration::from_secs(21));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_gives_up_after_max_attempts() {
        let jobs = Arc::new(MockJobService::default());
        jobs.fail_deletes("job_1_original", u32::MAX);
        let policy = RetryPolicy {
            max_attempts: Some(4),
            ..RetryPolicy::default()
        };
        let manager = manager(jobs.clone(), policy);

        let outcome = manager.delete_with_retry(1, Track::Original).await;

        match outcome {
            DeleteOutcome::GaveUp {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, 4);
                assert!(last_error.contains("throttled"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(jobs.delete_attempts("job_1_original"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_ends_the_loop_unless_configured_to_retry() {
        let jobs = Arc::new(MockJobService::default());
        jobs.missing_on_delete("job_5", 2);

        let strict = manager(jobs.clone(), RetryPolicy::default());
        let outcome = strict.delete_with_retry(5, Track::Processed).await;
        assert_eq!(
            outcome,
            DeleteOutcome::NotFound {
                name: "job_5".to_string(),
                attempts: 1
            }
        );

        let lenient = manager(
            jobs.clone(),
            RetryPolicy {
                retry_not_found: true,
                ..RetryPolicy::default()
            },
        );
        let outcome = lenient.delete_with_retry(5, Track::Processed).await;
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                name: "job_5".to_string(),
                attempts: 2
            }
        );
    }
}
