use axum::Router;
use axum::routing::post;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> axum::Router<AppState> {
    Router::new()
        .route("/enhance", post(handler::enhance))
        .route("/equalize", post(handler::equalize))
        .route("/analyze", post(handler::analyze))
        .route("/analyze/result", post(handler::analyze_result))
}
