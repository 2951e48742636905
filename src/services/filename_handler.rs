use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::{
    application::error::UploadError,
    domain::{config::service::ServiceConfig, models::result::ProcessingResult},
    services::{
        dto::{ErrorBody, UploadAccepted},
        response_handler::ResponseHandler,
    },
};

/// The service stores the masked image and answers with its filename, which
/// is then served from `{base}/processed/{filename}`.
pub struct FilenameIndirectionHandler {
    config: ServiceConfig,
}

impl FilenameIndirectionHandler {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ResponseHandler for FilenameIndirectionHandler {
    fn upload_path(&self) -> &'static str {
        "/upload/"
    }

    async fn on_success(&self, response: Response) -> Result<ProcessingResult, UploadError> {
        let accepted: UploadAccepted = response
            .json()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        // The token is used exactly as sent.
        let filename = accepted.filename;
        if filename.is_empty() || filename.contains('/') {
            return Err(UploadError::MalformedResponse(format!(
                "unusable filename '{}'",
                filename
            )));
        }

        let address = self
            .config
            .display_address(&format!("processed/{}", filename));
        Ok(ProcessingResult::Remote { filename, address })
    }

    async fn on_failure(&self, status: StatusCode, response: Response) -> UploadError {
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => Some(body.detail),
            Err(e) => {
                debug!("Error body without usable detail: {}", e);
                None
            }
        };

        UploadError::Server {
            status: status.as_u16(),
            detail,
        }
    }
}
