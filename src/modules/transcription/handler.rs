use super::dto::{BatchRequest, JobRequest};
use super::lifecycle::{DeleteOutcome, LifecycleError};
use super::model::TranscriptionJob;
use super::service::{BatchCleanupReport, BatchItem, DELETE_OK};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

fn lifecycle_status(e: &LifecycleError) -> StatusCode {
    match e {
        LifecycleError::Poll { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Start one transcription job
#[utoipa::path(
    post,
    path = "/api/v1/transcriptions/start",
    request_body = JobRequest,
    responses(
        (status = 200, description = "Job submitted", body = ApiResponse<TranscriptionJob>),
        (status = 400, description = "Bad Request"),
        (status = 502, description = "Job service rejected the job"),
        (status = 503, description = "Service not configured")
    ),
    tag = "Transcription"
)]
pub async fn start_job(
    State(state): State<AppState>,
    Json(payload): Json<JobRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.transcription() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.start(payload.index, payload.track()).await {
        Ok(job) => ApiSuccess(ApiResponse::success(job, "Transcription started"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), lifecycle_status(&e)).into_response(),
    }
}

/// Get the status of one transcription job
#[utoipa::path(
    post,
    path = "/api/v1/transcriptions/status",
    request_body = JobRequest,
    responses(
        (status = 200, description = "Job status", body = ApiResponse<TranscriptionJob>),
        (status = 404, description = "Job not found"),
        (status = 502, description = "Job service lookup failed")
    ),
    tag = "Transcription"
)]
pub async fn job_status(
    State(state): State<AppState>,
    Json(payload): Json<JobRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.transcription() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.poll(payload.index, payload.track()).await {
        Ok(job) => ApiSuccess(ApiResponse::success(job, "Transcription status retrieved"), StatusCode::OK).into_response(),
        Err(e) => ApiError(e.to_string(), lifecycle_status(&e)).into_response(),
    }
}

/// Delete one transcription job, retrying until the job service acknowledges it
#[utoipa::path(
    post,
    path = "/api/v1/transcriptions/delete",
    request_body = JobRequest,
    responses(
        (status = 200, description = "Job deleted or already gone", body = ApiResponse<DeleteOutcome>),
        (status = 502, description = "Gave up deleting the job")
    ),
    tag = "Transcription"
)]
pub async fn delete_job(
    State(state): State<AppState>,
    Json(payload): Json<JobRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.transcription() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    match service.delete(payload.index, payload.track()).await {
        DeleteOutcome::GaveUp { name, attempts, last_error } => ApiError(
            format!("gave up deleting {} after {} attempts: {}", name, attempts, last_error),
            StatusCode::BAD_GATEWAY,
        )
        .into_response(),
        outcome => ApiSuccess(ApiResponse::success(outcome, "Transcription deleted"), StatusCode::OK).into_response(),
    }
}

/// Start transcription jobs for indices 0..count
#[utoipa::path(
    post,
    path = "/api/v1/transcriptions/batch/start",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Per-index submission results", body = ApiResponse<Vec<BatchItem>>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Transcription"
)]
pub async fn start_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.transcription() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    let items = service.start_all(payload.batch()).await;
    ApiSuccess(ApiResponse::success(items, "Transcriptions started"), StatusCode::OK).into_response()
}

/// Get the status of transcription jobs for indices 0..count
#[utoipa::path(
    post,
    path = "/api/v1/transcriptions/batch/status",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Per-index statuses", body = ApiResponse<Vec<BatchItem>>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Transcription"
)]
pub async fn batch_status(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.transcription() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    let items = service.poll_all(payload.batch()).await;
    ApiSuccess(ApiResponse::success(items, "Transcription statuses retrieved"), StatusCode::OK).into_response()
}

/// Delete every job of the batch, then turn each result into a text file
#[utoipa::path(
    post,
    path = "/api/v1/transcriptions/batch/delete",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Both phases joined", body = ApiResponse<BatchCleanupReport>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Transcription"
)]
pub async fn delete_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::from(e).into_response();
    }
    let service = match state.transcription() {
        Ok(service) => service,
        Err(e) => return e.into_response(),
    };

    let report = service.delete_all_and_cleanup(payload.batch()).await;
    ApiSuccess(ApiResponse::success(report, DELETE_OK), StatusCode::OK).into_response()
}
