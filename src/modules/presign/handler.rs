use super::dto::{
    AnalyzeResultUrls, PresignBatchRequest, PresignIndexRequest, PresignedAnalyze, PresignedPairs,
};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// Presigned URLs for the enhancement step
#[utoipa::path(
    post,
    path = "/api/v1/presign/enhance",
    request_body = PresignBatchRequest,
    responses(
        (status = 200, description = "One url pair per index", body = ApiResponse<PresignedPairs>),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Presigning failed")
    ),
    tag = "Presign"
)]
pub async fn enhance(
    State(state): State<AppState>,
    Json(payload): Json<PresignBatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.presign() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.enhance(payload.count).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Enhance urls created"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// Presigned URLs for the equalization step
#[utoipa::path(
    post,
    path = "/api/v1/presign/equalize",
    request_body = PresignBatchRequest,
    responses(
        (status = 200, description = "One url pair per index", body = ApiResponse<PresignedPairs>),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Presigning failed")
    ),
    tag = "Presign"
)]
pub async fn equalize(
    State(state): State<AppState>,
    Json(payload): Json<PresignBatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.presign() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.equalize(payload.count).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Equalize urls created"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// Presigned URLs for analysing both tracks
#[utoipa::path(
    post,
    path = "/api/v1/presign/analyze",
    request_body = PresignBatchRequest,
    responses(
        (status = 200, description = "Audio and analysis urls per index", body = ApiResponse<PresignedAnalyze>),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Presigning failed")
    ),
    tag = "Presign"
)]
pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<PresignBatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.presign() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.analyze(payload.count).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Analyze urls created"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// Download URLs for one index's analysis documents
#[utoipa::path(
    post,
    path = "/api/v1/presign/analyze/result",
    request_body = PresignIndexRequest,
    responses(
        (status = 200, description = "Analysis document urls", body = ApiResponse<AnalyzeResultUrls>),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Presigning failed")
    ),
    tag = "Presign"
)]
pub async fn analyze_result(
    State(state): State<AppState>,
    Json(payload): Json<PresignIndexRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.presign() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.analyze_result(payload.index).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Analyze result urls created"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}
