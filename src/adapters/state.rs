use crate::{
    application::error::SubmissionError,
    domain::models::{file::FileId, result::ProcessingResult},
};

/// Tags an upload with the selection it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub file_id: FileId,
    pub attempt: u64,
}

/// Where the controller is. Loading, result and error are variants of one
/// enum, so at most one of them can ever be present.
#[derive(Debug, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    FileSelected,
    Submitting(SubmissionTicket),
    Success(ProcessingResult),
    Failed(SubmissionError),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::FileSelected => "file-selected",
            SubmissionState::Submitting(_) => "submitting",
            SubmissionState::Success(_) => "success",
            SubmissionState::Failed(_) => "failed",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting(_))
    }
}
