//! Axum route handlers for the upload endpoint.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::alignment::generator::{process_resume_and_jd, JdSource};
use crate::alignment::upload::{UploadForm, UploadStore};
use crate::errors::AppError;
use crate::models::upload::{JobDescription, SuggestionResult, UploadedDocument};
use crate::state::AppState;

const NO_RESUME: &str = "No resume file uploaded";
const INVALID_FORMAT: &str = "Invalid file format. Please upload PDF or DOCX.";
const NO_JOB_DESCRIPTION: &str = "No job description provided. Upload a file or paste the text.";

/// GET /upload
///
/// Readiness check. Takes no input.
pub async fn handle_readiness() -> Json<Value> {
    Json(json!({ "message": "success" }))
}

/// POST /upload
///
/// Multipart fields: `resume` (file, required), `jd_file` (file, optional),
/// `jd` (text, optional). An uploaded JD file wins over inline text; a JD
/// file with a disallowed extension is ignored.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SuggestionResult>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let allowed = &state.config.allowed_formats;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation(NO_RESUME.to_string()))?
        .validate(allowed)
        .ok_or_else(|| AppError::Validation(INVALID_FORMAT.to_string()))?;

    let job_description = match form.jd_file.and_then(|f| f.validate(allowed)) {
        Some(doc) => Some(JobDescription::Document(doc)),
        None => form
            .jd_text
            .filter(|text| !text.trim().is_empty())
            .map(JobDescription::Text),
    };

    let mut store = UploadStore::new(&state.config.upload_dir, state.config.upload_retention);
    let result = run_pipeline(&state, &mut store, &resume, job_description).await;
    store.finish().await;

    result.map(Json)
}

async fn run_pipeline(
    state: &AppState,
    store: &mut UploadStore<'_>,
    resume: &UploadedDocument,
    job_description: Option<JobDescription>,
) -> Result<SuggestionResult, AppError> {
    let resume = store.save(resume).await?;

    let jd = match job_description {
        Some(JobDescription::Document(doc)) => JdSource::File(store.save(&doc).await?),
        Some(JobDescription::Text(text)) => {
            info!("JD text received.");
            JdSource::Text(text)
        }
        None => return Err(AppError::Validation(NO_JOB_DESCRIPTION.to_string())),
    };

    process_resume_and_jd(
        state.backend.as_ref(),
        state.config.pdf_strategy,
        &resume,
        &jd,
    )
    .await
}
