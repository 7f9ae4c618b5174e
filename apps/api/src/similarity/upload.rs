//! Upload-based input: resumes arrive as multipart attachments and are
//! staged in a temporary folder for the duration of the request.

use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::analysis::extract::DocumentKind;
use crate::errors::AppError;
use crate::similarity::handlers::{run_pipeline, SimilarityResponse};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const FILES_FIELD: &str = "files";

/// Every upload request writes `<REPORT_DIR>/similarity_report.xlsx`, so
/// concurrent requests overwrite each other's spreadsheet and the last
/// writer wins. The JSON response is always specific to its request.
pub async fn calculate_for_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<SimilarityResponse, AppError> {
    let staging = tempfile::Builder::new()
        .prefix("resume-uploads-")
        .tempdir_in(&state.config.staging_dir)?;

    let mut job_description: Option<String> = None;
    let mut files: Vec<PathBuf> = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some(JOB_DESCRIPTION_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                job_description = Some(text);
            }
            Some(FILES_FIELD) => {
                let Some(filename) = field.file_name().and_then(secure_filename) else {
                    continue;
                };
                if !DocumentKind::from_filename(&filename).is_supported() {
                    debug!(file = %filename, "Ignoring upload with unsupported extension");
                    continue;
                }

                // One subfolder per upload so identical names do not overwrite each other.
                let slot = staging.path().join(files.len().to_string());
                tokio::fs::create_dir(&slot).await?;
                let path = slot.join(&filename);

                let mut out = tokio::fs::File::create(&path).await?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?
                {
                    out.write_all(&chunk).await?;
                }
                out.flush().await?;
                files.push(path);
            }
            _ => {}
        }
    }

    let job_description = job_description
        .ok_or_else(|| AppError::BadRequest("Missing field: job_description".to_string()))?;

    let report_dir = state.config.report_dir.clone();
    run_pipeline(state, job_description, files, report_dir, Some(staging)).await
}

/// Reduces a client-supplied filename to a safe, flat ASCII name.
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped, and leading or trailing `.`/`_` are trimmed.
/// Returns `None` when nothing usable is left.
pub fn secure_filename(raw: &str) -> Option<String> {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() || Path::new(trimmed).file_name().is_none() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename_keeps_plain_names() {
        assert_eq!(secure_filename("resume.pdf").as_deref(), Some("resume.pdf"));
        assert_eq!(secure_filename("Jane-Doe_CV.docx").as_deref(), Some("Jane-Doe_CV.docx"));
    }

    #[test]
    fn test_secure_filename_flattens_paths() {
        assert_eq!(
            secure_filename("../../etc/passwd").as_deref(),
            Some("etc_passwd")
        );
        assert_eq!(
            secure_filename(r"C:\Users\me\My Resume.pdf").as_deref(),
            Some("C_Users_me_My_Resume.pdf")
        );
    }

    #[test]
    fn test_secure_filename_replaces_whitespace() {
        assert_eq!(
            secure_filename("  my   cv 2024.docx ").as_deref(),
            Some("my_cv_2024.docx")
        );
    }

    #[test]
    fn test_secure_filename_drops_non_ascii() {
        assert_eq!(secure_filename("résumé.pdf").as_deref(), Some("rsum.pdf"));
    }

    #[test]
    fn test_secure_filename_rejects_empty_results() {
        assert_eq!(secure_filename(""), None);
        assert_eq!(secure_filename("..."), None);
        assert_eq!(secure_filename("日本語"), None);
    }

    #[test]
    fn test_secure_filename_strips_leading_dots() {
        assert_eq!(secure_filename(".hidden.pdf").as_deref(), Some("hidden.pdf"));
    }
}
