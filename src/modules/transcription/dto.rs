use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::model::{JobBatch, Track};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[validate(range(max = 9999, message = "index must be at most 9999"))]
    pub index: usize,
    #[serde(default)]
    pub is_original: bool,
}

impl JobRequest {
    pub fn track(&self) -> Track {
        Track::from_is_original(self.is_original)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[validate(range(max = 1000, message = "count must be at most 1000"))]
    pub count: usize,
    #[serde(default)]
    pub is_original: bool,
}

impl BatchRequest {
    pub fn batch(&self) -> JobBatch {
        JobBatch::new(self.count, Track::from_is_original(self.is_original))
    }
}
