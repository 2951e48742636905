use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please select an image first.";
pub const TRANSPORT_MESSAGE: &str =
    "Could not reach the masking service. Check your connection and try again.";
pub const SERVER_FALLBACK_MESSAGE: &str = "Image processing failed. Please try again.";

/// Raw failure from talking to the masking service. Messages here are for
/// logs only; users see the classified [`SubmissionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Service responded with status {status}")]
    Server { status: u16, detail: Option<String> },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Result not available: {0}")]
    Unavailable(String),
}

/// What the user is told when an attempt fails. `Display` is the final text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    #[error("{}", TRANSPORT_MESSAGE)]
    Transport,

    #[error("{0}")]
    Server(String),
}

impl SubmissionError {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::Validation => "validation",
            SubmissionError::Transport => "transport",
            SubmissionError::Server(_) => "server",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
