use crate::domain::models::preview::PreviewReference;

/// The masked image returned by the service, in one of two shapes.
#[derive(Debug)]
pub enum ProcessingResult {
    /// Image bytes came back inline and live behind a local reference.
    Inline(PreviewReference),
    /// The service stored the image and only named it.
    Remote { filename: String, address: String },
}

impl ProcessingResult {
    pub fn display_address(&self) -> &str {
        match self {
            ProcessingResult::Inline(reference) => reference.uri(),
            ProcessingResult::Remote { address, .. } => address,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ProcessingResult::Inline(_))
    }

    /// Frees any local reference held by the result. Remote results hold none.
    pub fn release(&mut self) {
        if let ProcessingResult::Inline(reference) = self {
            reference.release();
        }
    }
}
