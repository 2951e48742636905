use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use tracing::{info, warn};

use crate::{
    application::{error::UploadError, services::UploadService},
    domain::{
        config::service::ServiceConfig,
        models::{file::SelectedFile, preview::PreviewManager, result::ProcessingResult},
    },
    services::response_handler::ResponseHandler,
};

/// Multipart field the service reads the image from.
const FILE_FIELD: &str = "file";

pub struct UploadClient {
    client: Client,
    config: ServiceConfig,
    handler: Box<dyn ResponseHandler>,
    previews: PreviewManager,
}

impl UploadClient {
    pub fn new(
        config: ServiceConfig,
        handler: Box<dyn ResponseHandler>,
        previews: PreviewManager,
    ) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| UploadError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            handler,
            previews,
        })
    }

    fn build_form(file: &SelectedFile) -> Result<multipart::Form, UploadError> {
        let file_part = multipart::Part::bytes(file.content.to_vec())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| UploadError::InvalidRequest(e.to_string()))?;

        Ok(multipart::Form::new().part(FILE_FIELD, file_part))
    }
}

#[async_trait]
impl UploadService for UploadClient {
    async fn submit(&self, file: &SelectedFile) -> Result<ProcessingResult, UploadError> {
        let url = self.config.endpoint(self.handler.upload_path());
        let form = Self::build_form(file)?;

        info!(
            "Uploading {} ({} bytes, {}) to {}",
            file.filename,
            file.size(),
            file.mime_type,
            url
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error = self.handler.on_failure(status, response).await;
            warn!("Upload of {} rejected: {}", file.filename, error);
            return Err(error);
        }

        let result = self.handler.on_success(response).await?;
        info!(
            "Upload of {} processed: {}",
            file.filename,
            result.display_address()
        );
        Ok(result)
    }

    async fn download(&self, result: &ProcessingResult) -> Result<Bytes, UploadError> {
        match result {
            ProcessingResult::Inline(reference) => self
                .previews
                .resolve(reference.uri())
                .map(|entry| entry.content)
                .ok_or_else(|| UploadError::Unavailable(reference.uri().to_string())),
            ProcessingResult::Remote { address, .. } => {
                let url = self.config.resolve(address);
                info!("Fetching processed image from {}", url);

                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(UploadError::from)?;

                if !response.status().is_success() {
                    return Err(UploadError::Server {
                        status: response.status().as_u16(),
                        detail: None,
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Transport(e.to_string()))
            }
        }
    }
}
