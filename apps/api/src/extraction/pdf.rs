use lopdf::Document;

use super::{ExtractionError, PdfStrategy};

pub(super) fn extract(bytes: &[u8], strategy: PdfStrategy) -> Result<String, ExtractionError> {
    match strategy {
        PdfStrategy::PageIteration => extract_by_page(bytes),
        PdfStrategy::WholeDocument => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
    }
}

/// Page texts are concatenated in page-number order with no separator.
/// A page that fails to extract fails the whole document.
fn extract_by_page(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    // BTreeMap keyed by 1-based page number.
    let pages = doc.get_pages();
    pages
        .keys()
        .map(|&page| {
            doc.extract_text(&[page])
                .map_err(|e| ExtractionError::Pdf(format!("page {page}: {e}")))
        })
        .collect()
}
