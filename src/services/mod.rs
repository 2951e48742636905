mod dto;
mod error;
mod filename_handler;
mod inline_binary_handler;
mod response_handler;
mod upload_client;

pub use filename_handler::FilenameIndirectionHandler;
pub use inline_binary_handler::InlineBinaryHandler;
pub use response_handler::ResponseHandler;
pub use upload_client::UploadClient;

use std::sync::Arc;

use tracing::info;

use crate::{
    application::{error::UploadError, services::UploadService},
    domain::{
        config::service::{ResponseVariant, ServiceConfig},
        models::preview::PreviewManager,
    },
};

pub fn create_response_handler(
    config: &ServiceConfig,
    previews: &PreviewManager,
) -> Box<dyn ResponseHandler> {
    match config.variant {
        ResponseVariant::InlineBinary => Box::new(InlineBinaryHandler::new(previews.clone())),
        ResponseVariant::FilenameIndirection => {
            Box::new(FilenameIndirectionHandler::new(config.clone()))
        }
    }
}

pub fn create_upload_service(
    config: &ServiceConfig,
    previews: &PreviewManager,
) -> Result<Arc<dyn UploadService>, UploadError> {
    info!(
        "Using '{}' response contract against {}",
        config.variant.as_str(),
        config.endpoint("")
    );

    let handler = create_response_handler(config, previews);
    let client = UploadClient::new(config.clone(), handler, previews.clone())?;
    Ok(Arc::new(client))
}
