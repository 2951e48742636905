use std::process::ExitCode;

use pii_mask_client::{
    adapters::{cli, controllers::SubmissionController},
    domain::{config::service::ServiceConfig, models::preview::PreviewManager},
    services,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr so the rendered view on stdout stays readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Starting pii-mask-client (base: {}, variant: {}, timeout: {:?})",
        config.base,
        config.variant.as_str(),
        config.request_timeout
    );

    let previews = PreviewManager::new();
    let upload = match services::create_upload_service(&config, &previews) {
        Ok(upload) => upload,
        Err(e) => {
            tracing::error!("Failed to create upload client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let controller = SubmissionController::new(upload.clone(), previews.clone());

    cli::run(controller, upload).await;

    let stats = previews.stats();
    tracing::info!(
        "Previews created: {}, released: {}",
        stats.created,
        stats.released
    );

    ExitCode::SUCCESS
}
