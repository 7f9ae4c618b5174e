//! Path-based input: resumes are read from a folder on the server.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::similarity::handlers::{run_pipeline, SimilarityResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FolderRequest {
    pub job_description: Option<String>,
    pub folder_path: Option<String>,
}

pub async fn calculate_for_folder(
    state: &AppState,
    request: FolderRequest,
) -> Result<SimilarityResponse, AppError> {
    if !state.config.enable_folder_scan {
        return Err(AppError::BadRequest(
            "Folder scanning is disabled; upload the files instead".to_string(),
        ));
    }

    let job_description = request
        .job_description
        .ok_or_else(|| AppError::BadRequest("Missing field: job_description".to_string()))?;
    let folder_path = request
        .folder_path
        .ok_or_else(|| AppError::BadRequest("Missing field: folder_path".to_string()))?;

    let folder = PathBuf::from(&folder_path);
    let is_dir = tokio::fs::metadata(&folder)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(AppError::BadRequest("Invalid folder path".to_string()));
    }

    let files = list_files(&folder).await?;
    info!(folder = %folder.display(), files = files.len(), "Scanning resume folder");

    run_pipeline(state, job_description, files, folder, None).await
}

/// Regular files directly inside `folder`, sorted by file name.
/// Symlinks are followed; a dangling link is skipped.
pub async fn list_files(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!(file = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
