use std::fmt;

use crate::adapters::{controllers::SubmissionController, state::SubmissionState};

pub const ORIGINAL_PLACEHOLDER: &str = "Select an image to see a preview.";
pub const PROCESSED_PLACEHOLDER: &str = "Your masked image will appear here.";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedPane {
    Placeholder,
    Loading,
    Error(String),
    Image(String),
}

/// Snapshot of what the user sees, derived from controller state only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub selected: Option<String>,
    pub original: Option<String>,
    pub processed: ProcessedPane,
    pub submit_enabled: bool,
}

pub struct ResultRenderer;

impl ResultRenderer {
    pub fn render(controller: &SubmissionController) -> View {
        let processed = match controller.state() {
            SubmissionState::Idle | SubmissionState::FileSelected => ProcessedPane::Placeholder,
            SubmissionState::Submitting(_) => ProcessedPane::Loading,
            SubmissionState::Failed(error) => ProcessedPane::Error(error.message()),
            SubmissionState::Success(result) => {
                ProcessedPane::Image(result.display_address().to_string())
            }
        };

        let selected = controller.selected_file().map(|file| {
            format!(
                "{} ({} bytes, selected {})",
                file.filename,
                file.size(),
                file.selected_at.format("%H:%M:%S UTC")
            )
        });

        View {
            selected,
            original: controller.preview().map(|p| p.uri().to_string()),
            processed,
            submit_enabled: controller.can_submit(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(selected) = &self.selected {
            writeln!(f, "Selected file:   {}", selected)?;
        }

        match &self.original {
            Some(uri) => writeln!(f, "Original image:  {}", uri)?,
            None => writeln!(f, "Original image:  {}", ORIGINAL_PLACEHOLDER)?,
        }

        match &self.processed {
            ProcessedPane::Placeholder => writeln!(f, "Processed image: {}", PROCESSED_PLACEHOLDER)?,
            ProcessedPane::Loading => writeln!(f, "Processed image: {}", LOADING_TEXT)?,
            ProcessedPane::Image(address) => writeln!(f, "Processed image: {}", address)?,
            ProcessedPane::Error(message) => writeln!(f, "Error: {}", message)?,
        }

        let button = if matches!(self.processed, ProcessedPane::Loading) {
            "Processing..."
        } else {
            "Process Image"
        };
        let availability = if self.submit_enabled { "" } else { " (disabled)" };
        write!(f, "[{}]{}", button, availability)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::{
        application::{error::UploadError, services::UploadService},
        domain::models::{file::SelectedFile, preview::PreviewManager, result::ProcessingResult},
    };

    struct FixedUpload(Option<&'static str>);

    #[async_trait]
    impl UploadService for FixedUpload {
        async fn submit(&self, _file: &SelectedFile) -> Result<ProcessingResult, UploadError> {
            match self.0 {
                Some(detail) => Err(UploadError::Server {
                    status: 400,
                    detail: Some(detail.to_string()),
                }),
                None => Ok(ProcessingResult::Remote {
                    filename: "abc.png".to_string(),
                    address: "/api/processed/abc.png".to_string(),
                }),
            }
        }

        async fn download(&self, _result: &ProcessingResult) -> Result<Bytes, UploadError> {
            Ok(Bytes::new())
        }
    }

    fn controller(failure: Option<&'static str>) -> SubmissionController {
        SubmissionController::new(Arc::new(FixedUpload(failure)), PreviewManager::new())
    }

    fn image() -> SelectedFile {
        SelectedFile::new(b"img".to_vec(), "a.png", "image/png")
    }

    #[test]
    fn idle_view_shows_placeholders() {
        let view = ResultRenderer::render(&controller(None));

        assert_eq!(view.selected, None);
        assert_eq!(view.original, None);
        assert_eq!(view.processed, ProcessedPane::Placeholder);
        assert!(!view.submit_enabled);
        assert!(view.to_string().contains(ORIGINAL_PLACEHOLDER));
        assert!(view.to_string().ends_with("[Process Image] (disabled)"));
    }

    #[test]
    fn loading_shown_only_while_submitting() {
        let mut controller = controller(None);
        controller.select(image());
        assert_eq!(
            ResultRenderer::render(&controller).processed,
            ProcessedPane::Placeholder
        );

        let _pending = controller.begin_submit().unwrap();
        let view = ResultRenderer::render(&controller);

        assert_eq!(view.processed, ProcessedPane::Loading);
        assert!(!view.submit_enabled);
        assert!(view.to_string().contains("[Processing...] (disabled)"));
    }

    #[test]
    fn reselection_during_upload_keeps_submit_disabled() {
        let mut controller = controller(None);
        controller.select(image());
        let _pending = controller.begin_submit().unwrap();

        controller.select(SelectedFile::new(b"img2".to_vec(), "b.png", "image/png"));
        let view = ResultRenderer::render(&controller);

        assert_eq!(view.processed, ProcessedPane::Placeholder);
        assert!(!view.submit_enabled);
        assert!(view.to_string().ends_with("[Process Image] (disabled)"));
    }

    #[tokio::test]
    async fn success_shows_processed_image_only() {
        let mut controller = controller(None);
        controller.select(image());
        controller.submit().await;

        let view = ResultRenderer::render(&controller);

        assert!(view.original.as_deref().unwrap().starts_with("blob:"));
        assert!(view.selected.as_deref().unwrap().starts_with("a.png (3 bytes"));
        assert_eq!(
            view.processed,
            ProcessedPane::Image("/api/processed/abc.png".to_string())
        );
        assert!(!view.to_string().contains("Error"));
    }

    #[tokio::test]
    async fn failure_shows_error_only() {
        let mut controller = controller(Some("File must be an image"));
        controller.select(image());
        controller.submit().await;

        let view = ResultRenderer::render(&controller);

        assert_eq!(
            view.processed,
            ProcessedPane::Error("File must be an image".to_string())
        );
        assert!(view.to_string().contains("Error: File must be an image"));
        assert!(!view.to_string().contains(LOADING_TEXT));
        assert!(view.submit_enabled);
    }
}
