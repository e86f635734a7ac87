//! Alignment pipeline: extract, compose, generate, post-process.
//!
//! Strictly sequential: the resume is extracted first, then the job
//! description (if it arrived as a file), then one model call. Any failure
//! ends the pipeline; nothing partial is returned.

use tracing::info;

use crate::alignment::prompts::{ALIGNMENT_PROMPT_TEMPLATE, JD_SLOT, RESUME_SLOT};
use crate::alignment::upload::StoredDocument;
use crate::errors::AppError;
use crate::extraction::{extract_text, PdfStrategy};
use crate::llm_client::SuggestionBackend;
use crate::models::upload::SuggestionResult;

/// Job description after upload handling: inline text, or a saved file.
#[derive(Debug, Clone)]
pub enum JdSource {
    Text(String),
    File(StoredDocument),
}

/// Substitutes both texts into the alignment template.
///
/// Only the template is scanned for placeholders, so a resume that happens
/// to contain `{jd_text}` is passed through literally.
pub fn compose_prompt(resume_text: &str, jd_text: &str) -> String {
    let template = ALIGNMENT_PROMPT_TEMPLATE;
    let mut prompt = String::with_capacity(template.len() + resume_text.len() + jd_text.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        prompt.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(RESUME_SLOT) {
            prompt.push_str(resume_text);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(JD_SLOT) {
            prompt.push_str(jd_text);
            rest = after;
        } else {
            prompt.push('{');
            rest = &tail[1..];
        }
    }
    prompt.push_str(rest);
    prompt
}

/// Removes every literal `**` from model output.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
}

/// Runs the whole pipeline for one request.
pub async fn process_resume_and_jd(
    backend: &dyn SuggestionBackend,
    pdf_strategy: PdfStrategy,
    resume: &StoredDocument,
    jd: &JdSource,
) -> Result<SuggestionResult, AppError> {
    let resume_text = extract_text(&resume.path, resume.format, pdf_strategy).await?;

    let jd_text = match jd {
        JdSource::Text(text) => text.clone(),
        JdSource::File(doc) => extract_text(&doc.path, doc.format, pdf_strategy).await?,
    };

    let prompt = compose_prompt(&resume_text, &jd_text);
    info!(
        "Requesting alignment suggestions from {} ({} prompt chars)",
        backend.model(),
        prompt.len()
    );

    let raw = backend.complete(&prompt).await?;
    let suggestions = strip_emphasis(&raw);
    info!("Suggestions generated ({} chars)", suggestions.len());

    Ok(SuggestionResult { suggestions })
}
