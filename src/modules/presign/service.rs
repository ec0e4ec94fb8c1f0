use std::time::Duration;
use tracing::debug;

use super::dto::{AnalyzeResultUrls, AnalyzeUrls, PresignedAnalyze, PresignedPairs, UrlPair};
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::transcription::naming::{ORIGINAL_MEDIA_FOLDER, PROCESSED_MEDIA_FOLDER};
use crate::modules::transcription::ports::ObjectStoreError;

const EQUALIZE_FOLDER: &str = "equalize";
const ANALYZE_FOLDER: &str = "analyze";

fn wav_key(folder: &str, index: usize) -> String {
    format!("{}/{}.wav", folder, index + 1)
}

fn analysis_key(index: usize, original: bool) -> String {
    if original {
        format!("{}/{}_origin.json", ANALYZE_FOLDER, index + 1)
    } else {
        format!("{}/{}.json", ANALYZE_FOLDER, index + 1)
    }
}

/// Hands out presigned URLs so clients can move audio and analysis files
/// in and out of the bucket directly.
pub struct PresignService {
    storage: StorageService,
    ttl: Duration,
}

impl PresignService {
    pub fn new(storage: StorageService, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    async fn pair(&self, from: &str, to: &str) -> Result<UrlPair, ObjectStoreError> {
        let input = self.storage.presign_get(from, self.ttl).await?;
        let output = self.storage.presign_put(to, self.ttl).await?;
        debug!(from, to, "presigned url pair");
        Ok(UrlPair { input, output })
    }

    /// original/N.wav -> enhance/N.wav
    pub async fn enhance(&self, count: usize) -> Result<PresignedPairs, ObjectStoreError> {
        let mut urls = Vec::with_capacity(count);
        for i in 0..count {
            urls.push(
                self.pair(&wav_key(ORIGINAL_MEDIA_FOLDER, i), &wav_key(PROCESSED_MEDIA_FOLDER, i))
                    .await?,
            );
        }
        Ok(PresignedPairs { count, urls })
    }

    /// enhance/N.wav -> equalize/N.wav
    pub async fn equalize(&self, count: usize) -> Result<PresignedPairs, ObjectStoreError> {
        let mut urls = Vec::with_capacity(count);
        for i in 0..count {
            urls.push(
                self.pair(&wav_key(PROCESSED_MEDIA_FOLDER, i), &wav_key(EQUALIZE_FOLDER, i))
                    .await?,
            );
        }
        Ok(PresignedPairs { count, urls })
    }

    /// Both tracks' audio in, one analysis document per track out.
    pub async fn analyze(&self, count: usize) -> Result<PresignedAnalyze, ObjectStoreError> {
        let mut urls = Vec::with_capacity(count);
        for i in 0..count {
            let original = self
                .pair(&wav_key(ORIGINAL_MEDIA_FOLDER, i), &analysis_key(i, true))
                .await?;
            let processed = self
                .pair(&wav_key(PROCESSED_MEDIA_FOLDER, i), &analysis_key(i, false))
                .await?;
            urls.push(AnalyzeUrls {
                original_input: original.input,
                original_output: original.output,
                input: processed.input,
                output: processed.output,
            });
        }
        Ok(PresignedAnalyze { count, urls })
    }

    pub async fn analyze_result(&self, index: usize) -> Result<AnalyzeResultUrls, ObjectStoreError> {
        Ok(AnalyzeResultUrls {
            original_analyze_json: self.storage.presign_get(&analysis_key(index, true), self.ttl).await?,
            analyze_json: self.storage.presign_get(&analysis_key(index, false), self.ttl).await?,
        })
    }
}
