pub mod storage;
pub mod transcribe;
