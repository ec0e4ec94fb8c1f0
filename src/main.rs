use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

use config::settings::{self, AppConfig};
use infrastructure::storage::s3::StorageService;
use infrastructure::transcribe::client::TranscribeService;
use modules::presign::service::PresignService;
use modules::transcription::cleanup::TranscriptCleanup;
use modules::transcription::lifecycle::{JobSettings, TranscriptionJobManager};
use modules::transcription::service::TranscriptionService;
use state::{AppState, Services};

async fn build_services(config: &AppConfig) -> Services {
    let storage = StorageService::new(
        config.s3_endpoint.as_deref(),
        &config.aws_region,
        &config.s3_bucket,
        &config.aws_access_key,
        &config.aws_secret_key,
    )
    .await;
    let transcribe = TranscribeService::new(
        &config.aws_region,
        &config.aws_access_key,
        &config.aws_secret_key,
    )
    .await;

    let jobs = TranscriptionJobManager::new(
        Arc::new(transcribe),
        JobSettings {
            bucket: config.s3_bucket.clone(),
            media_format: config.media_format.clone(),
            language_code: config.language_code.clone(),
        },
        config.retry_policy(),
    );
    let cleanup = TranscriptCleanup::new(Arc::new(storage.clone()));

    Services {
        transcription: Arc::new(TranscriptionService::new(
            Arc::new(jobs),
            Arc::new(cleanup),
            config.batch_max_in_flight,
        )),
        presign: Arc::new(PresignService::new(storage, config.presign_ttl())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let state = match AppConfig::new() {
        Ok(config) => AppState::new(build_services(&config).await),
        Err(e) => {
            error!(error = %e, "configuration incomplete, serving errors until it is fixed");
            AppState::unconfigured(e.to_string())
        }
    };

    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", settings::server_port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
