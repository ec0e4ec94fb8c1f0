//! Deterministic job names and object keys.
//!
//! Indices are zero-based. Job names use the index as is, object keys use
//! `index + 1`.

use super::model::Track;

pub const ORIGINAL_MEDIA_FOLDER: &str = "original";
pub const PROCESSED_MEDIA_FOLDER: &str = "enhance";
pub const ORIGINAL_RESULT_FOLDER: &str = "stt_original";
pub const PROCESSED_RESULT_FOLDER: &str = "stt";

pub fn job_name(index: usize, track: Track) -> String {
    match track {
        Track::Original => format!("job_{}_original", index),
        Track::Processed => format!("job_{}", index),
    }
}

pub fn media_key(index: usize, track: Track) -> String {
    let folder = match track {
        Track::Original => ORIGINAL_MEDIA_FOLDER,
        Track::Processed => PROCESSED_MEDIA_FOLDER,
    };
    format!("{}/{}.wav", folder, index + 1)
}

pub fn result_key(index: usize, track: Track) -> String {
    format!("{}/{}.json", result_folder(track), index + 1)
}

/// Always under the processed result folder, whatever the track.
pub fn derived_text_key(index: usize) -> String {
    format!("{}/{}.txt", PROCESSED_RESULT_FOLDER, index + 1)
}

pub fn media_uri(bucket: &str, index: usize, track: Track) -> String {
    format!("s3://{}/{}", bucket, media_key(index, track))
}

fn result_folder(track: Track) -> &'static str {
    match track {
        Track::Original => ORIGINAL_RESULT_FOLDER,
        Track::Processed => PROCESSED_RESULT_FOLDER,
    }
}
