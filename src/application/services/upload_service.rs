use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::error::UploadError,
    domain::models::{file::SelectedFile, result::ProcessingResult},
};

#[async_trait]
pub trait UploadService: Send + Sync {
    async fn submit(&self, file: &SelectedFile) -> Result<ProcessingResult, UploadError>;
    async fn download(&self, result: &ProcessingResult) -> Result<Bytes, UploadError>;
}
