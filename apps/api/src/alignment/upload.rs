//! Multipart form parsing and the upload working directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::config::UploadRetention;
use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::models::upload::UploadedDocument;

pub const RESUME_FIELD: &str = "resume";
pub const JD_FILE_FIELD: &str = "jd_file";
pub const JD_TEXT_FIELD: &str = "jd";

/// A file part as it arrived, before extension validation.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl RawFile {
    /// Accepts the file only if its extension is in `allowed`.
    pub fn validate(self, allowed: &[DocumentFormat]) -> Option<UploadedDocument> {
        let format = DocumentFormat::from_filename(&self.filename)?;
        allowed.contains(&format).then(|| UploadedDocument {
            bytes: self.bytes,
            filename: self.filename,
            format,
        })
    }
}

/// The recognised fields of a submission. Unknown fields are drained and
/// ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub resume: Option<RawFile>,
    pub jd_file: Option<RawFile>,
    pub jd_text: Option<String>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                RESUME_FIELD | JD_FILE_FIELD => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let bytes = field.bytes().await?;
                    // Browsers send an empty, unnamed part for an untouched file input.
                    if filename.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    let file = Some(RawFile { filename, bytes });
                    if name == RESUME_FIELD {
                        form.resume = file;
                    } else {
                        form.jd_file = file;
                    }
                }
                JD_TEXT_FIELD => {
                    let text = field.text().await?;
                    form.jd_text = Some(text);
                }
                other => {
                    debug!("Ignoring unexpected form field '{other}'");
                    field.bytes().await?;
                }
            }
        }

        Ok(form)
    }
}

/// Reduces a client filename to `[A-Za-z0-9._-]`, with whitespace and path
/// separators collapsed to `_` and leading/trailing dots and underscores
/// removed. `../../etc/passwd` becomes `etc_passwd`.
///
/// Compatibility decomposition runs first, so accented letters keep their
/// base letter: `résumé.pdf` becomes `resume.pdf`.
pub fn sanitize_filename(filename: &str) -> String {
    let separated: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
    let safe: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    safe.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// An upload written to the working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

/// Files written for one request, removed at the end of it when retention
/// is `Delete`.
///
/// With `Keep`, files land under their sanitized names, so two concurrent
/// uploads of `resume.pdf` write the same path and the later write wins.
/// With `Delete`, every file gets a UUID prefix: one request's cleanup must
/// never remove a file another request is still reading.
pub struct UploadStore<'a> {
    dir: &'a Path,
    retention: UploadRetention,
    saved: Vec<PathBuf>,
}

impl<'a> UploadStore<'a> {
    pub fn new(dir: &'a Path, retention: UploadRetention) -> Self {
        Self {
            dir,
            retention,
            saved: Vec::new(),
        }
    }

    /// Writes `doc` under its sanitized name (UUID-prefixed when it will be
    /// deleted) and returns where it went.
    pub async fn save(&mut self, doc: &UploadedDocument) -> Result<StoredDocument, AppError> {
        let mut name = sanitize_filename(&doc.filename);
        if name.is_empty() {
            name = format!("upload-{}.{}", Uuid::new_v4(), doc.format);
        }
        let mut path = self.dir.join(&name);
        // Never let the job description overwrite the resume saved moments ago.
        if self.retention == UploadRetention::Delete || self.saved.contains(&path) {
            path = self.dir.join(format!("{}-{name}", Uuid::new_v4()));
        }

        tokio::fs::write(&path, &doc.bytes)
            .await
            .with_context(|| format!("Failed to save upload to {}", path.display()))?;
        info!("{} file saved at: {}", doc.format, path.display());

        self.saved.push(path.clone());
        Ok(StoredDocument {
            path,
            format: doc.format,
        })
    }

    /// Applies the retention policy to everything saved so far.
    pub async fn finish(self) {
        if self.retention == UploadRetention::Keep {
            return;
        }
        for path in &self.saved {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to remove upload {}: {e}", path.display());
            }
        }
    }
}
