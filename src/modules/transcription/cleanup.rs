use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::naming;
use super::ports::ObjectStore;

const TRANSCRIPT_POINTER: &str = "/results/transcripts/0/transcript";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CleanupStep {
    Fetch,
    Parse,
    Write,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CleanupStepFailure {
    pub step: CleanupStep,
    pub reason: String,
}

/// Per-index result of a cleanup run. Only logged and returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupOutcome {
    pub index: usize,
    pub result_key: String,
    pub text_key: String,
    /// Characters written to `text_key`, if the write went through.
    pub written_chars: Option<usize>,
    pub source_deleted: bool,
    pub failures: Vec<CleanupStepFailure>,
}

impl CleanupOutcome {
    fn new(index: usize, result_key: &str) -> Self {
        Self {
            index,
            result_key: result_key.to_string(),
            text_key: naming::derived_text_key(index),
            written_chars: None,
            source_deleted: false,
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, step: CleanupStep, reason: impl ToString) {
        self.failures.push(CleanupStepFailure {
            step,
            reason: reason.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pulls the transcript text out of a job result document. Anything missing
/// or malformed yields `None`.
pub fn extract_transcript(body: &[u8]) -> Option<String> {
    let doc: serde_json::Value = serde_json::from_slice(body).ok()?;
    doc.pointer(TRANSCRIPT_POINTER)?.as_str().map(str::to_owned)
}

/// Turns a finished job's result document into a plain text artifact and
/// removes the document. Best effort: a failed step is logged and the
/// following steps still run.
pub struct TranscriptCleanup {
    store: Arc<dyn ObjectStore>,
}

impl TranscriptCleanup {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn cleanup(&self, index: usize, result_key: &str) -> CleanupOutcome {
        let mut outcome = CleanupOutcome::new(index, result_key);

        // 1. fetch
        let body = match self.store.get(result_key).await {
            Ok(body) => {
                debug!(index, key = %result_key, bytes = body.len(), "fetched transcription result");
                Some(body)
            }
            Err(e) => {
                warn!(index, key = %result_key, error = %e, "couldn't get transcription result");
                outcome.fail(CleanupStep::Fetch, e);
                None
            }
        };

        // 2. parse, 3. write
        if let Some(body) = body {
            let text = match extract_transcript(&body) {
                Some(text) => text,
                None => {
                    warn!(index, key = %result_key, "no transcript in result, writing empty text");
                    outcome.fail(CleanupStep::Parse, "results.transcripts[0].transcript missing");
                    String::new()
                }
            };

            let chars = text.chars().count();
            let written = self
                .store
                .put(&outcome.text_key, Bytes::from(text), TEXT_CONTENT_TYPE)
                .await;
            match written {
                Ok(()) => {
                    info!(index, key = %outcome.text_key, chars, "transcript text written");
                    outcome.written_chars = Some(chars);
                }
                Err(e) => {
                    warn!(index, key = %outcome.text_key, error = %e, "couldn't upload transcript text");
                    outcome.fail(CleanupStep::Write, e);
                }
            }
        }

        // 4. delete
        match self.store.delete(result_key).await {
            Ok(()) => {
                debug!(index, key = %result_key, "transcription result deleted");
                outcome.source_deleted = true;
            }
            Err(e) => {
                warn!(index, key = %result_key, error = %e, "couldn't delete transcription result");
                outcome.fail(CleanupStep::Delete, e);
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::transcription::test_support::MockObjectStore;

    const RESULT: &str = r#"{"results":{"transcripts":[{"transcript":"hello world"}]}}"#;

    #[test]
    fn extracts_first_transcript() {
        let body = br#"{"results":{"transcripts":[{"transcript":"a"},{"transcript":"b"}]}}"#;
        assert_eq!(extract_transcript(body).as_deref(), Some("a"));
    }

    #[test]
    fn malformed_documents_yield_nothing() {
        assert_eq!(extract_transcript(b"not json"), None);
        assert_eq!(extract_transcript(br#"{"results":{"transcripts":[]}}"#), None);
        assert_eq!(extract_transcript(br#"{"results":{"transcripts":[{"transcript":3}]}}"#), None);
    }

    #[tokio::test]
    async fn writes_text_and_removes_result() {
        let store = Arc::new(MockObjectStore::default());
        store.insert("stt/1.json", RESULT);
        let cleanup = TranscriptCleanup::new(store.clone());

        let outcome = cleanup.cleanup(0, "stt/1.json").await;

        assert!(outcome.is_clean());
        assert_eq!(outcome.written_chars, Some(11));
        assert!(outcome.source_deleted);
        assert_eq!(store.text("stt/1.txt").as_deref(), Some("hello world"));
        assert!(!store.contains("stt/1.json"));
    }

    #[tokio::test]
    async fn original_track_result_still_writes_under_stt() {
        let store = Arc::new(MockObjectStore::default());
        store.insert("stt_original/2.json", RESULT);
        let cleanup = TranscriptCleanup::new(store.clone());

        let outcome = cleanup.cleanup(1, "stt_original/2.json").await;

        assert_eq!(outcome.text_key, "stt/2.txt");
        assert_eq!(store.text("stt/2.txt").as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn delete_runs_even_when_write_fails() {
        let store = Arc::new(MockObjectStore::default());
        store.insert("stt/1.json", RESULT);
        store.fail_puts_to("stt/1.txt");
        let cleanup = TranscriptCleanup::new(store.clone());

        let outcome = cleanup.cleanup(0, "stt/1.json").await;

        assert_eq!(store.put_attempts("stt/1.txt"), vec!["hello world".to_string()]);
        assert!(store.calls().contains(&"delete stt/1.json".to_string()));
        assert!(outcome.source_deleted);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].step, CleanupStep::Write);
    }

    #[tokio::test]
    async fn missing_transcript_writes_empty_text() {
        let store = Arc::new(MockObjectStore::default());
        store.insert("stt/4.json", r#"{"results":{}}"#);
        let cleanup = TranscriptCleanup::new(store.clone());

        let outcome = cleanup.cleanup(3, "stt/4.json").await;

        assert_eq!(store.text("stt/4.txt").as_deref(), Some(""));
        assert_eq!(outcome.written_chars, Some(0));
        assert_eq!(outcome.failures[0].step, CleanupStep::Parse);
        assert!(outcome.source_deleted);
    }

    #[tokio::test]
    async fn failed_fetch_skips_write_but_still_deletes() {
        let store = Arc::new(MockObjectStore::default());
        let cleanup = TranscriptCleanup::new(store.clone());

        let outcome = cleanup.cleanup(0, "stt/1.json").await;

        assert_eq!(
            store.calls(),
            vec!["get stt/1.json".to_string(), "delete stt/1.json".to_string()]
        );
        assert_eq!(outcome.failures[0].step, CleanupStep::Fetch);
        assert_eq!(outcome.written_chars, None);
    }

    #[tokio::test]
    async fn every_failing_step_is_recorded() {
        let store = Arc::new(MockObjectStore::default());
        store.insert("stt/1.json", "garbage");
        store.fail_puts_to("stt/1.txt");
        store.fail_deletes_of("stt/1.json");
        let cleanup = TranscriptCleanup::new(store.clone());

        let outcome = cleanup.cleanup(0, "stt/1.json").await;

        let steps: Vec<_> = outcome.failures.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![CleanupStep::Parse, CleanupStep::Write, CleanupStep::Delete]);
        assert!(!outcome.source_deleted);
    }
}
