use crate::application::error::UploadError;

impl From<reqwest::Error> for UploadError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            UploadError::Transport("Request timeout".to_string())
        } else if error.is_connect() {
            UploadError::Transport(format!("Connection failed: {}", error))
        } else if error.is_builder() {
            UploadError::InvalidRequest(error.to_string())
        } else if let Some(status) = error.status() {
            UploadError::Server {
                status: status.as_u16(),
                detail: None,
            }
        } else if error.is_decode() {
            UploadError::MalformedResponse(error.to_string())
        } else {
            UploadError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refused_connections_are_transport_errors() {
        let error = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(UploadError::from(error), UploadError::Transport(_)));
    }

    #[tokio::test]
    async fn unparsable_urls_are_invalid_requests() {
        let error = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(
            UploadError::from(error),
            UploadError::InvalidRequest(_)
        ));
    }
}
