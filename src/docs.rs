use utoipa::OpenApi;
use crate::modules::presign::dto::*;
use crate::modules::transcription::dto::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::transcription::handler::start_job,
        crate::modules::transcription::handler::job_status,
        crate::modules::transcription::handler::delete_job,
        crate::modules::transcription::handler::start_batch,
        crate::modules::transcription::handler::batch_status,
        crate::modules::transcription::handler::delete_batch,
        crate::modules::presign::handler::enhance,
        crate::modules::presign::handler::equalize,
        crate::modules::presign::handler::analyze,
        crate::modules::presign::handler::analyze_result,
    ),
    components(
        schemas(
            JobRequest, BatchRequest,
            crate::modules::transcription::model::TranscriptionJob,
            crate::modules::transcription::model::Track,
            crate::modules::transcription::model::JobStatus,
            crate::modules::transcription::lifecycle::DeleteOutcome,
            crate::modules::transcription::cleanup::CleanupOutcome,
            crate::modules::transcription::cleanup::CleanupStep,
            crate::modules::transcription::cleanup::CleanupStepFailure,
            crate::modules::transcription::service::BatchItem,
            crate::modules::transcription::service::DeletionItem,
            crate::modules::transcription::service::CleanupItem,
            crate::modules::transcription::service::BatchCleanupReport,
            PresignBatchRequest, PresignIndexRequest, UrlPair, PresignedPairs,
            AnalyzeUrls, PresignedAnalyze, AnalyzeResultUrls,
        )
    ),
    tags(
        (name = "Transcription", description = "Speech-to-text job lifecycle"),
        (name = "Presign", description = "Presigned bucket URLs for audio processing")
    )
)]
pub struct ApiDoc;
