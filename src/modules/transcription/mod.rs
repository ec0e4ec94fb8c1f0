use axum::Router;
use axum::routing::post;
use crate::state::AppState;

pub mod cleanup;
pub mod dto;
pub mod handler;
pub mod lifecycle;
pub mod model;
pub mod naming;
pub mod ports;
pub mod retry;
pub mod service;
#[cfg(test)]
pub mod test_support;

pub fn router() -> axum::Router<AppState> {
    Router::new()
        .route("/start", post(handler::start_job))
        .route("/status", post(handler::job_status))
        .route("/delete", post(handler::delete_job))
        .route("/batch/start", post(handler::start_batch))
        .route("/batch/status", post(handler::batch_status))
        .route("/batch/delete", post(handler::delete_batch))
}
