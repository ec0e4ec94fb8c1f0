use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PresignBatchRequest {
    #[validate(range(min = 1, max = 1000, message = "count must be between 1 and 1000"))]
    pub count: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PresignIndexRequest {
    #[validate(range(max = 9999, message = "index must be at most 9999"))]
    pub index: usize,
}

/// Where a processing step reads its input and writes its output.
#[derive(Debug, Serialize, ToSchema)]
pub struct UrlPair {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresignedPairs {
    pub count: usize,
    pub urls: Vec<UrlPair>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeUrls {
    pub original_input: String,
    pub original_output: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignedAnalyze {
    pub count: usize,
    pub urls: Vec<AnalyzeUrls>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResultUrls {
    pub original_analyze_json: String,
    pub analyze_json: String,
}
