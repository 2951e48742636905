use async_trait::async_trait;
use reqwest::{header, Response, StatusCode};
use tracing::debug;

use crate::{
    application::error::UploadError,
    domain::models::{preview::PreviewManager, result::ProcessingResult},
    services::response_handler::ResponseHandler,
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// The service answers with the masked image itself.
pub struct InlineBinaryHandler {
    previews: PreviewManager,
}

impl InlineBinaryHandler {
    pub fn new(previews: PreviewManager) -> Self {
        Self { previews }
    }
}

#[async_trait]
impl ResponseHandler for InlineBinaryHandler {
    fn upload_path(&self) -> &'static str {
        "/upload"
    }

    async fn on_success(&self, response: Response) -> Result<ProcessingResult, UploadError> {
        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();

        let content = response
            .bytes()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if content.is_empty() {
            return Err(UploadError::MalformedResponse(
                "empty image body".to_string(),
            ));
        }

        let reference = self.previews.create_preview(content, &mime_type);
        Ok(ProcessingResult::Inline(reference))
    }

    async fn on_failure(&self, status: StatusCode, _response: Response) -> UploadError {
        // Error bodies from this contract carry nothing worth showing.
        debug!("Inline upload failed with status {}", status);
        UploadError::Server {
            status: status.as_u16(),
            detail: None,
        }
    }
}
