//! Similarity report: the ordered per-resume outcomes of one request, and
//! their spreadsheet and JSON renderings.

pub mod spreadsheet;

use serde::Serialize;
use thiserror::Error;

pub use spreadsheet::{write_report, REPORT_FILE_NAME};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Whole-number similarity, 0–100.
    Scored(u8),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub resume: String,
    pub outcome: RowOutcome,
}

impl ReportRow {
    pub fn new(resume: impl Into<String>, outcome: RowOutcome) -> Self {
        Self {
            resume: resume.into(),
            outcome,
        }
    }
}

/// Rows in processing order. Never sorted by score.
#[derive(Debug, Clone, Default)]
pub struct Report {
    rows: Vec<ReportRow>,
}

/// JSON shape of a scored row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScoredEntry {
    #[serde(rename = "Resume")]
    pub resume: String,
    #[serde(rename = "Similarity")]
    pub similarity: String,
}

/// JSON shape of a failed row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailedEntry {
    #[serde(rename = "Resume")]
    pub resume: String,
    #[serde(rename = "Error")]
    pub error: String,
}

impl Report {
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn scored_count(&self) -> usize {
        self.scored_entries().len()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.len() - self.scored_count()
    }

    pub fn scored_entries(&self) -> Vec<ScoredEntry> {
        self.rows
            .iter()
            .filter_map(|row| match row.outcome {
                RowOutcome::Scored(p) => Some(ScoredEntry {
                    resume: row.resume.clone(),
                    similarity: format_percentage(p),
                }),
                RowOutcome::Failed(_) => None,
            })
            .collect()
    }

    pub fn failed_entries(&self) -> Vec<FailedEntry> {
        self.rows
            .iter()
            .filter_map(|row| match &row.outcome {
                RowOutcome::Failed(reason) => Some(FailedEntry {
                    resume: row.resume.clone(),
                    error: reason.clone(),
                }),
                RowOutcome::Scored(_) => None,
            })
            .collect()
    }
}

pub fn format_percentage(percentage: u8) -> String {
    format!("{percentage}%")
}
