use axum::http::StatusCode;
use std::sync::Arc;

use crate::common::response::ApiError;
use crate::modules::presign::service::PresignService;
use crate::modules::transcription::service::TranscriptionService;

/// Built once at startup and shared by every request and every fan-out task.
#[derive(Clone)]
pub struct Services {
    pub transcription: Arc<TranscriptionService>,
    pub presign: Arc<PresignService>,
}

#[derive(Clone)]
pub struct AppState {
    services: Result<Services, Arc<str>>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services: Ok(services),
        }
    }

    /// State for a process whose configuration could not be loaded. Every
    /// request that needs the AWS clients answers with `reason`.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            services: Err(Arc::from(reason.into())),
        }
    }

    pub fn transcription(&self) -> Result<Arc<TranscriptionService>, ApiError> {
        self.services()
            .map(|s| Arc::clone(&s.transcription))
    }

    pub fn presign(&self) -> Result<Arc<PresignService>, ApiError> {
        self.services().map(|s| Arc::clone(&s.presign))
    }

    fn services(&self) -> Result<&Services, ApiError> {
        self.services.as_ref().map_err(|reason| {
            ApiError(
                format!("service is not configured: {}", reason),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        })
    }
}
