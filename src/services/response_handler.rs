use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use crate::{application::error::UploadError, domain::models::result::ProcessingResult};

/// Interprets the masking service's answer to an upload. One implementation
/// per response contract; the upload client is shared.
#[async_trait]
pub trait ResponseHandler: Send + Sync {
    /// Path under `{base}` that uploads are posted to.
    fn upload_path(&self) -> &'static str;

    async fn on_success(&self, response: Response) -> Result<ProcessingResult, UploadError>;

    async fn on_failure(&self, status: StatusCode, response: Response) -> UploadError;
}
