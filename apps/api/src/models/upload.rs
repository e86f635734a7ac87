use bytes::Bytes;
use serde::Serialize;

use crate::extraction::DocumentFormat;

/// A file received in the multipart form whose extension passed validation.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Bytes,
    /// Filename as sent by the client, before sanitization.
    pub filename: String,
    pub format: DocumentFormat,
}

/// Where the job description for a request comes from.
#[derive(Debug, Clone)]
pub enum JobDescription {
    Text(String),
    Document(UploadedDocument),
}

/// The model's free-text alignment suggestions, emphasis markers removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub suggestions: String,
}
