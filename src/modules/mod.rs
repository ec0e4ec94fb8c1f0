pub mod presign;
pub mod transcription;
