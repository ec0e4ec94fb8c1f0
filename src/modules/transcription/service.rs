use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::cleanup::{CleanupOutcome, TranscriptCleanup};
use super::lifecycle::{DeleteOutcome, LifecycleError, TranscriptionJobManager};
use super::model::{JobBatch, TranscriptionJob, Track};
use super::naming;
use crate::workers::stage::{StageReport, TaskResult, TaskStage};

pub const DELETE_OK: &str = "delete ok";

/// Per-index result of a single-phase batch operation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub index: usize,
    pub job: Option<TranscriptionJob>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletionItem {
    pub index: usize,
    pub outcome: Option<DeleteOutcome>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupItem {
    pub index: usize,
    pub outcome: Option<CleanupOutcome>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchCleanupReport {
    pub message: String,
    pub deletions: Vec<DeletionItem>,
    pub cleanups: Vec<CleanupItem>,
}

fn lost_message(reason: String) -> Option<String> {
    Some(format!("task lost: {reason}"))
}

/// Fans single-job operations out over a batch and joins them. Batches share
/// nothing but the injected clients, so concurrent calls don't interfere.
pub struct TranscriptionService {
    jobs: Arc<TranscriptionJobManager>,
    cleanup: Arc<TranscriptCleanup>,
    max_in_flight: usize,
}

impl TranscriptionService {
    pub fn new(
        jobs: Arc<TranscriptionJobManager>,
        cleanup: Arc<TranscriptCleanup>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            jobs,
            cleanup,
            max_in_flight,
        }
    }

    pub async fn start(&self, index: usize, track: Track) -> Result<TranscriptionJob, LifecycleError> {
        self.jobs.start(index, track).await
    }

    pub async fn poll(&self, index: usize, track: Track) -> Result<TranscriptionJob, LifecycleError> {
        self.jobs.poll(index, track).await
    }

    pub async fn delete(&self, index: usize, track: Track) -> DeleteOutcome {
        self.jobs.delete_with_retry(index, track).await
    }

    pub async fn start_all(&self, batch: JobBatch) -> Vec<BatchItem> {
        let track = batch.track;
        let report = self
            .stage("start")
            .run(batch.indices(), |index| {
                let jobs = Arc::clone(&self.jobs);
                async move { jobs.start(index, track).await }
            })
            .await;
        Self::batch_items(report)
    }

    pub async fn poll_all(&self, batch: JobBatch) -> Vec<BatchItem> {
        let track = batch.track;
        let report = self
            .stage("poll")
            .run(batch.indices(), |index| {
                let jobs = Arc::clone(&self.jobs);
                async move { jobs.poll(index, track).await }
            })
            .await;
        Self::batch_items(report)
    }

    pub async fn delete_all(&self, batch: JobBatch) -> StageReport<DeleteOutcome> {
        let track = batch.track;
        self.stage("delete")
            .run(batch.indices(), |index| {
                let jobs = Arc::clone(&self.jobs);
                async move { jobs.delete_with_retry(index, track).await }
            })
            .await
    }

    pub async fn cleanup_all(&self, batch: JobBatch) -> StageReport<CleanupOutcome> {
        let track = batch.track;
        self.stage("cleanup")
            .run(batch.indices(), |index| {
                let cleanup = Arc::clone(&self.cleanup);
                async move {
                    let key = naming::result_key(index, track);
                    cleanup.cleanup(index, &key).await
                }
            })
            .await
    }

    /// Deletes every job of the batch, waits for all of them, then turns every
    /// result document into text.
    pub async fn delete_all_and_cleanup(&self, batch: JobBatch) -> BatchCleanupReport {
        info!(count = batch.count, track = %batch.track, "deleting batch");
        let deletions = self.delete_all(batch).await;

        let attempts: u32 = deletions
            .results
            .iter()
            .filter_map(|(_, r)| match r {
                TaskResult::Finished(outcome) => Some(outcome.attempts()),
                TaskResult::Lost(_) => None,
            })
            .sum();
        let gave_up = deletions
            .results
            .iter()
            .filter(|(_, r)| matches!(r, TaskResult::Finished(outcome) if !outcome.is_gone()))
            .count();
        info!(stage = deletions.name, jobs = deletions.len(), attempts, "delete phase joined");
        if gave_up > 0 || deletions.lost() > 0 {
            warn!(gave_up, lost = deletions.lost(), "some jobs were not deleted, cleaning up anyway");
        }

        let cleanups = self.cleanup_all(batch).await;
        let incomplete = cleanups
            .results
            .iter()
            .filter(|(_, r)| !matches!(r, TaskResult::Finished(outcome) if outcome.is_clean()))
            .count();
        info!(
            stage = cleanups.name,
            count = batch.count,
            track = %batch.track,
            incomplete,
            "batch deleted and cleaned up"
        );

        BatchCleanupReport {
            message: DELETE_OK.to_string(),
            deletions: deletions
                .results
                .into_iter()
                .map(|(index, r)| match r {
                    TaskResult::Finished(outcome) => DeletionItem {
                        index,
                        outcome: Some(outcome),
                        error: None,
                    },
                    TaskResult::Lost(reason) => DeletionItem {
                        index,
                        outcome: None,
                        error: lost_message(reason),
                    },
                })
                .collect(),
            cleanups: cleanups
                .results
                .into_iter()
                .map(|(index, r)| match r {
                    TaskResult::Finished(outcome) => CleanupItem {
                        index,
                        outcome: Some(outcome),
                        error: None,
                    },
                    TaskResult::Lost(reason) => CleanupItem {
                        index,
                        outcome: None,
                        error: lost_message(reason),
                    },
                })
                .collect(),
        }
    }

    fn stage(&self, name: &'static str) -> TaskStage {
        TaskStage::new(name, self.max_in_flight)
    }

    fn batch_items(report: StageReport<Result<TranscriptionJob, LifecycleError>>) -> Vec<BatchItem> {
        report
            .results
            .into_iter()
            .map(|(index, r)| match r {
                TaskResult::Finished(Ok(job)) => BatchItem {
                    index,
                    job: Some(job),
                    error: None,
                },
                TaskResult::Finished(Err(e)) => BatchItem {
                    index,
                    job: None,
                    error: Some(e.to_string()),
                },
                TaskResult::Lost(reason) => BatchItem {
                    index,
                    job: None,
                    error: lost_message(reason),
                },
            })
            .collect()
    }
}
