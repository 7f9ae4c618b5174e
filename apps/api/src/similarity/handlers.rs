//! Axum route handler for the similarity API.

use std::path::PathBuf;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Serialize;
use tempfile::TempDir;
use tracing::warn;

use crate::analysis::batch::BatchScorer;
use crate::errors::AppError;
use crate::report::{write_report, FailedEntry, ScoredEntry};
use crate::similarity::folder::{calculate_for_folder, FolderRequest};
use crate::similarity::upload::calculate_for_upload;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub similarity_report: Vec<ScoredEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_resumes: Vec<FailedEntry>,
    pub excel_file_path: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /calculate_similarity
///
/// JSON bodies name a server-side folder to scan; multipart bodies carry
/// the resumes as `files` attachments. Both need a `job_description`.
pub async fn handle_calculate_similarity(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<SimilarityResponse>, AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let response = if content_type.starts_with("application/json") {
        let Json(body) = Json::<FolderRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        calculate_for_folder(&state, body).await?
    } else if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        calculate_for_upload(&state, multipart).await?
    } else {
        return Err(AppError::BadRequest(
            "Content-Type must be application/json or multipart/form-data".to_string(),
        ));
    };

    Ok(Json(response))
}

/// Scores `files` and writes the spreadsheet into `report_dir`, off the async
/// executor. `staging` is removed once scoring is done.
pub async fn run_pipeline(
    state: &AppState,
    job_description: String,
    files: Vec<PathBuf>,
    report_dir: PathBuf,
    staging: Option<TempDir>,
) -> Result<SimilarityResponse, AppError> {
    let normalizer = state.normalizer();
    let strategy = state.config.idf_strategy;

    let (report, excel_path) = tokio::task::spawn_blocking(move || {
        let report = BatchScorer::new(&normalizer, strategy).score_files(&job_description, &files);

        if let Some(dir) = staging {
            if let Err(e) = dir.close() {
                warn!(error = %e, "Failed to remove upload staging folder");
            }
        }

        let excel_path = write_report(&report, &report_dir)?;
        Ok::<_, AppError>((report, excel_path))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("similarity worker failed: {e}")))??;

    Ok(SimilarityResponse {
        similarity_report: report.scored_entries(),
        failed_resumes: report.failed_entries(),
        excel_file_path: excel_path.display().to_string(),
    })
}
