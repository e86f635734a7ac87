//! Document Text Extractor: turns an uploaded PDF or DOCX file into plain text.
//!
//! Parsing is synchronous and CPU-bound, so the library calls run on tokio's
//! blocking pool. No structure is recovered: a resume is just a string.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

mod docx;
mod pdf;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// A document format the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Infers the format from the last dot-suffix of a client filename,
    /// case-insensitively. A name without a dot has no format.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How PDF text is pulled out of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PdfStrategy {
    /// Walk pages in order with `lopdf` and concatenate each page's text.
    #[default]
    PageIteration,
    /// Hand the whole document to `pdf-extract` in one call.
    WholeDocument,
}

impl FromStr for PdfStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pages" => Ok(PdfStrategy::PageIteration),
            "whole" => Ok(PdfStrategy::WholeDocument),
            other => Err(anyhow::anyhow!("unknown PDF extractor '{other}'")),
        }
    }
}

/// Extracts the plain text of the file at `path`, interpreted as `format`.
///
/// Returns `ExtractionError::NotFound` if the file vanished between upload
/// and extraction. A failed existence check (permissions, a non-directory
/// parent) is an `Io` error, not a missing file. Library failures (corrupt files, unsupported encodings)
/// come back as `Pdf`/`Docx` errors and are not further classified.
pub async fn extract_text(
    path: &Path,
    format: DocumentFormat,
    pdf_strategy: PdfStrategy,
) -> Result<String, ExtractionError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }

    info!("Opening {} file: {}", format, path.display());
    let bytes = tokio::fs::read(path).await?;

    let text = tokio::task::spawn_blocking(move || match format {
        DocumentFormat::Pdf => pdf::extract(&bytes, pdf_strategy),
        DocumentFormat::Docx => docx::extract(&bytes),
    })
    .await
    .map_err(|e| ExtractionError::Task(e.to_string()))??;

    info!(
        "{} text extraction completed ({} chars)",
        format,
        text.chars().count()
    );
    Ok(text)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use docx_rs::{Docx, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a DOCX with one paragraph per entry.
    pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            let paragraph = if text.is_empty() {
                Paragraph::new()
            } else {
                Paragraph::new().add_run(Run::new().add_text(*text))
            };
            docx = docx.add_paragraph(paragraph);
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    /// Builds a PDF with one Courier text line per page.
    pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
