use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    adapters::state::{SubmissionState, SubmissionTicket},
    application::{
        error::{SubmissionError, UploadError},
        error_classifier::classify,
        services::UploadService,
    },
    domain::models::{
        file::SelectedFile,
        preview::{PreviewManager, PreviewReference},
        result::ProcessingResult,
    },
};

struct Selection {
    file: Arc<SelectedFile>,
    preview: PreviewReference,
}

/// An upload that has been started but not yet run. Produced by
/// [`SubmissionController::begin_submit`]; feed its outcome back through
/// [`SubmissionController::apply`].
pub struct PendingSubmission {
    ticket: SubmissionTicket,
    file: Arc<SelectedFile>,
    upload: Arc<dyn UploadService>,
}

impl PendingSubmission {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    pub async fn run(self) -> SubmissionOutcome {
        let result = self.upload.submit(&self.file).await;
        SubmissionOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SubmissionOutcome {
    pub ticket: SubmissionTicket,
    pub result: Result<ProcessingResult, UploadError>,
}

/// Owns the current selection, its preview and the outcome of the latest
/// upload. Must only be driven from one task.
pub struct SubmissionController {
    upload: Arc<dyn UploadService>,
    previews: PreviewManager,
    selection: Option<Selection>,
    state: SubmissionState,
    // The one upload allowed in flight, kept even after reselection makes it stale.
    outstanding: Option<SubmissionTicket>,
    attempts: u64,
}

impl SubmissionController {
    pub fn new(upload: Arc<dyn UploadService>, previews: PreviewManager) -> Self {
        Self {
            upload,
            previews,
            selection: None,
            state: SubmissionState::Idle,
            outstanding: None,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.as_ref().map(|s| s.file.as_ref())
    }

    pub fn preview(&self) -> Option<&PreviewReference> {
        self.selection.as_ref().map(|s| &s.preview)
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        match &self.state {
            SubmissionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match &self.state {
            SubmissionState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selection.is_some() && self.outstanding.is_none()
    }

    /// True while an upload has been started and its outcome not yet applied,
    /// including one made stale by a later selection.
    pub fn is_awaiting_response(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Replaces the current selection. The previous preview is released
    /// before the new one is created, and any result or error is cleared.
    /// Allowed in every state; an upload still in flight becomes stale, and
    /// no new upload can start until it completes.
    pub fn select(&mut self, file: SelectedFile) {
        if let Some(mut previous) = self.selection.take() {
            self.previews.release(&mut previous.preview);
        }
        if self.outstanding.is_some() {
            info!("Selection changed while an upload is in flight; its response will be ignored");
        }
        self.clear_outcome();

        let preview = self.previews.create_preview(file.content.clone(), &file.mime_type);
        info!(
            "Selected {} ({} bytes) as {}",
            file.filename,
            file.size(),
            file.id
        );

        self.selection = Some(Selection {
            file: Arc::new(file),
            preview,
        });
        self.state = SubmissionState::FileSelected;
    }

    /// Moves to `Submitting` and hands back the upload to run. Returns `None`
    /// when an upload is already in flight (even a stale one), or when nothing
    /// is selected, in which case the controller fails with a validation
    /// error right away.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if let Some(ticket) = self.outstanding {
            debug!(
                "Submit ignored, attempt {} is still in flight",
                ticket.attempt
            );
            return None;
        }

        let Some(file) = self
            .selection
            .as_ref()
            .filter(|selection| !selection.file.is_empty())
            .map(|selection| Arc::clone(&selection.file))
        else {
            warn!("Submit requested without a selected image");
            self.clear_outcome();
            self.state = SubmissionState::Failed(SubmissionError::Validation);
            return None;
        };

        self.attempts += 1;
        let ticket = SubmissionTicket {
            file_id: file.id,
            attempt: self.attempts,
        };

        self.clear_outcome();
        self.outstanding = Some(ticket);
        self.state = SubmissionState::Submitting(ticket);
        info!("Submitting {} (attempt {})", file.filename, ticket.attempt);

        Some(PendingSubmission {
            ticket,
            file,
            upload: Arc::clone(&self.upload),
        })
    }

    /// Applies a finished upload. Outcomes whose ticket does not match the
    /// upload currently awaited are dropped, releasing anything they hold.
    /// Returns whether the state changed.
    pub fn apply(&mut self, outcome: SubmissionOutcome) -> bool {
        if self.outstanding == Some(outcome.ticket) {
            self.outstanding = None;
        }

        let current = match &self.state {
            SubmissionState::Submitting(ticket) => Some(*ticket),
            _ => None,
        };
        if current != Some(outcome.ticket) {
            debug!(
                "Discarding stale response for {} (attempt {})",
                outcome.ticket.file_id, outcome.ticket.attempt
            );
            if let Ok(mut result) = outcome.result {
                result.release();
            }
            return false;
        }

        self.state = match outcome.result {
            Ok(result) => {
                info!("Processed image ready at {}", result.display_address());
                SubmissionState::Success(result)
            }
            Err(error) => {
                let classified = classify(&error);
                warn!(
                    "Upload failed ({}): {} -> {}",
                    classified.kind(),
                    error,
                    classified
                );
                SubmissionState::Failed(classified)
            }
        };
        true
    }

    /// Starts an upload and waits for it. Returns whether its outcome was
    /// applied.
    pub async fn submit(&mut self) -> bool {
        match self.begin_submit() {
            Some(pending) => {
                let outcome = pending.run().await;
                self.apply(outcome)
            }
            None => false,
        }
    }

    /// Releases every local reference and returns to `Idle`.
    pub fn teardown(&mut self) {
        self.clear_outcome();
        if let Some(mut selection) = self.selection.take() {
            self.previews.release(&mut selection.preview);
        }
        self.state = SubmissionState::Idle;
    }

    fn clear_outcome(&mut self) {
        if let SubmissionState::Success(result) = &mut self.state {
            result.release();
        }
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
