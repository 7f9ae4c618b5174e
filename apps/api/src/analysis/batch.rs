//! Batch orchestration: extraction → normalization → scoring for every
//! resume in a request, in input order.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::extract::{extract_text, Document, DocumentKind};
use crate::analysis::normalize::Normalizer;
use crate::analysis::tfidf::{cosine_similarity, pair_similarity, to_percentage, TfidfModel};
use crate::report::{Report, ReportRow, RowOutcome};

/// Which documents make up the IDF corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdfStrategy {
    /// A fresh two-document corpus per resume: the resume and the job description.
    #[default]
    Pair,
    /// One corpus for the request: the job description and every extracted resume.
    Batch,
}

#[derive(Debug, Error)]
#[error("unknown IDF strategy '{0}'")]
pub struct UnknownIdfStrategy(pub String);

impl FromStr for IdfStrategy {
    type Err = UnknownIdfStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pair" => Ok(IdfStrategy::Pair),
            "batch" => Ok(IdfStrategy::Batch),
            other => Err(UnknownIdfStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for IdfStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdfStrategy::Pair => write!(f, "pair"),
            IdfStrategy::Batch => write!(f, "batch"),
        }
    }
}

/// Scores resumes against a single job description.
pub struct BatchScorer<'a> {
    normalizer: &'a Normalizer,
    strategy: IdfStrategy,
}

impl<'a> BatchScorer<'a> {
    pub fn new(normalizer: &'a Normalizer, strategy: IdfStrategy) -> Self {
        Self {
            normalizer,
            strategy,
        }
    }

    /// Reads and scores each file. Unsupported extensions produce no row;
    /// a file that cannot be read or extracted produces a failed row and
    /// the rest of the batch carries on.
    pub fn score_files(&self, job_description: &str, files: &[PathBuf]) -> Report {
        info!(
            files = files.len(),
            strategy = %self.strategy,
            "Scoring resume batch"
        );

        let normalized_jd = self.normalizer.normalize(job_description);

        let mut prepared: Vec<(String, Result<String, String>)> = Vec::new();
        for path in files {
            let filename = display_name(path);
            if !DocumentKind::from_filename(&filename).is_supported() {
                debug!(file = %filename, "Skipping unsupported file");
                continue;
            }
            let text = self.prepare(path, &filename);
            prepared.push((filename, text));
        }

        let report = match self.strategy {
            IdfStrategy::Pair => score_pairwise(&normalized_jd, prepared),
            IdfStrategy::Batch => score_in_shared_space(&normalized_jd, prepared),
        };

        info!(
            scored = report.scored_count(),
            failed = report.failed_count(),
            "Resume batch complete"
        );
        report
    }

    fn prepare(&self, path: &Path, filename: &str) -> Result<String, String> {
        let document = Document::load(path).map_err(|e| {
            warn!(file = %filename, error = %e, "Failed to read resume");
            format!("failed to read file: {e}")
        })?;

        let raw = extract_text(document.kind, &document.bytes).map_err(|e| {
            warn!(file = %document.filename, error = %e, "Failed to extract resume text");
            e.to_string()
        })?;

        Ok(self.normalizer.normalize(&raw))
    }
}

fn score_pairwise(normalized_jd: &str, prepared: Vec<(String, Result<String, String>)>) -> Report {
    let mut report = Report::default();
    for (filename, text) in prepared {
        let outcome = match text {
            Ok(resume) => {
                let percentage = to_percentage(pair_similarity(&resume, normalized_jd));
                debug!(file = %filename, similarity = percentage, "Scored resume");
                RowOutcome::Scored(percentage)
            }
            Err(reason) => RowOutcome::Failed(reason),
        };
        report.push(ReportRow::new(filename, outcome));
    }
    report
}

fn score_in_shared_space(
    normalized_jd: &str,
    prepared: Vec<(String, Result<String, String>)>,
) -> Report {
    let mut corpus: Vec<&str> = vec![normalized_jd];
    corpus.extend(prepared.iter().filter_map(|(_, t)| t.as_deref().ok()));
    let model = TfidfModel::fit(&corpus);
    debug!(
        documents = model.n_documents(),
        vocabulary = model.vocabulary_size(),
        "Fitted shared IDF space"
    );
    let jd_vector = model.transform(normalized_jd);

    let mut report = Report::default();
    for (filename, text) in prepared {
        let outcome = match text {
            Ok(resume) => {
                let score = cosine_similarity(&model.transform(&resume), &jd_vector);
                let percentage = to_percentage(score);
                debug!(file = %filename, similarity = percentage, "Scored resume");
                RowOutcome::Scored(percentage)
            }
            Err(reason) => RowOutcome::Failed(reason),
        };
        report.push(ReportRow::new(filename, outcome));
    }
    report
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
