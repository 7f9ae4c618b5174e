use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::report::{Report, ReportError};

pub const REPORT_FILE_NAME: &str = "similarity_report.xlsx";

const REPORT_SHEET: &str = "Similarity Report";
const FAILURES_SHEET: &str = "Failures";

/// Writes `similarity_report.xlsx` into `dir` and returns its path.
///
/// The first sheet holds one `Resume`/`Similarity` row per scored resume.
/// A `Failures` sheet is added only when some resumes could not be read.
pub fn write_report(report: &Report, dir: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE_NAME);

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(REPORT_SHEET)?;
    write_table(sheet, &header, ["Resume", "Similarity"], &similarity_rows(report))?;

    let failures = failure_rows(report);
    if !failures.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(FAILURES_SHEET)?;
        write_table(sheet, &header, ["Resume", "Error"], &failures)?;
    }

    workbook.save(&path)?;
    info!(path = %path.display(), rows = report.rows().len(), "Wrote similarity report");

    Ok(path)
}

fn write_table(
    sheet: &mut rust_xlsxwriter::Worksheet,
    header: &Format,
    columns: [&str; 2],
    rows: &[[String; 2]],
) -> Result<(), ReportError> {
    for (col, title) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let line = (i + 1) as u32;
        sheet.write_string(line, 0, row[0].as_str())?;
        sheet.write_string(line, 1, row[1].as_str())?;
    }
    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(1, 14)?;
    Ok(())
}

fn similarity_rows(report: &Report) -> Vec<[String; 2]> {
    report
        .scored_entries()
        .into_iter()
        .map(|e| [e.resume, e.similarity])
        .collect()
}

fn failure_rows(report: &Report) -> Vec<[String; 2]> {
    report
        .failed_entries()
        .into_iter()
        .map(|e| [e.resume, e.error])
        .collect()
}
