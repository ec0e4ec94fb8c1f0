use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use super::naming;

/// Which of the two parallel audio pipelines a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Original,
    Processed,
}

impl Track {
    pub fn from_is_original(is_original: bool) -> Self {
        if is_original {
            Track::Original
        } else {
            Track::Processed
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Original => f.write_str("original"),
            Track::Processed => f.write_str("processed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
    Unknown,
}

impl JobStatus {
    /// Maps the job service's status text. Queued jobs count as in progress.
    pub fn from_status_text(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "QUEUED" | "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::Unknown,
        }
    }
}

/// A transcription job as seen from this side. Nothing here is persisted:
/// every identifier is re-derived from `(index, track)`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionJob {
    pub index: usize,
    pub track: Track,
    pub name: String,
    pub media_key: String,
    pub output_key: String,
    pub status: JobStatus,
    /// Raw status text as reported by the job service, when one was observed.
    pub status_text: Option<String>,
}

impl TranscriptionJob {
    pub fn new(index: usize, track: Track) -> Self {
        Self {
            index,
            track,
            name: naming::job_name(index, track),
            media_key: naming::media_key(index, track),
            output_key: naming::result_key(index, track),
            status: JobStatus::Unknown,
            status_text: None,
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.status = JobStatus::from_status_text(&text);
        self.status_text = Some(text);
        self
    }
}

/// Operate on indices `0..count` of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobBatch {
    pub count: usize,
    pub track: Track,
}

impl JobBatch {
    pub fn new(count: usize, track: Track) -> Self {
        Self { count, track }
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.count
    }
}
