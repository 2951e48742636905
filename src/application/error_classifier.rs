use crate::application::error::{SubmissionError, UploadError, SERVER_FALLBACK_MESSAGE};

/// Maps a failed upload onto what the user sees. Never yields an empty message.
pub fn classify(error: &UploadError) -> SubmissionError {
    match error {
        UploadError::Transport(_) => SubmissionError::Transport,
        UploadError::Server {
            detail: Some(detail),
            ..
        } if !detail.trim().is_empty() => SubmissionError::Server(detail.clone()),
        UploadError::Server { .. }
        | UploadError::InvalidRequest(_)
        | UploadError::MalformedResponse(_)
        | UploadError::Unavailable(_) => {
            SubmissionError::Server(SERVER_FALLBACK_MESSAGE.to_string())
        }
    }
}

impl From<UploadError> for SubmissionError {
    fn from(error: UploadError) -> Self {
        classify(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::{TRANSPORT_MESSAGE, VALIDATION_MESSAGE};

    #[test]
    fn transport_failures_get_the_generic_transport_message() {
        let classified = classify(&UploadError::Transport("connection refused".to_string()));

        assert_eq!(classified, SubmissionError::Transport);
        assert_eq!(classified.to_string(), TRANSPORT_MESSAGE);
    }

    #[test]
    fn server_detail_is_shown_verbatim() {
        let classified = classify(&UploadError::Server {
            status: 413,
            detail: Some("file too large".to_string()),
        });

        assert_eq!(classified.to_string(), "file too large");
    }

    #[test]
    fn missing_or_blank_detail_falls_back() {
        for detail in [None, Some(String::new()), Some("   ".to_string())] {
            let classified = classify(&UploadError::Server {
                status: 500,
                detail,
            });
            assert_eq!(classified.to_string(), SERVER_FALLBACK_MESSAGE);
        }
    }

    #[test]
    fn malformed_success_bodies_are_server_errors() {
        let classified: SubmissionError =
            UploadError::MalformedResponse("missing filename".to_string()).into();

        assert_eq!(classified.kind(), "server");
        assert!(!classified.message().is_empty());
    }

    #[test]
    fn requests_rejected_before_sending_get_the_server_fallback() {
        let classified = classify(&UploadError::InvalidRequest(
            "invalid mime type 'not a mime'".to_string(),
        ));

        assert_eq!(classified.kind(), "server");
        assert_eq!(classified.to_string(), SERVER_FALLBACK_MESSAGE);
    }

    #[test]
    fn validation_message_is_fixed() {
        assert_eq!(SubmissionError::Validation.message(), VALIDATION_MESSAGE);
    }
}
