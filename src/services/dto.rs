use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UploadAccepted {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
