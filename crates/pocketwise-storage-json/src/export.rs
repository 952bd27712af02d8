use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pocketwise_core::{
    report::{pdf, ReportDocument},
    CoreError,
};
use pocketwise_domain::Ledger;

use crate::replace_file;

pub const PDF_REPORT_FILE: &str = "pocketwise-financial-report.pdf";

/// `pocketwise-export-YYYY-MM-DD.json` for the export date.
pub fn json_export_file_name(date: NaiveDate) -> String {
    format!("pocketwise-export-{}.json", date.format("%Y-%m-%d"))
}

/// Writes the ledger as pretty-printed JSON into `dir`.
///
/// The file uses the same shape as the stored snapshot. On failure no file
/// is left at the target path.
pub fn export_json(ledger: &Ledger, dir: &Path, date: NaiveDate) -> Result<PathBuf, CoreError> {
    let path = dir.join(json_export_file_name(date));
    let data = serde_json::to_string_pretty(ledger)?;
    replace_file(&path, data.as_bytes()).map_err(|err| export_error(&path, err))?;
    tracing::info!(
        path = %path.display(),
        transactions = ledger.transactions.len(),
        "exported ledger as JSON"
    );
    Ok(path)
}

/// Renders `document` and writes it to `dir/pocketwise-financial-report.pdf`.
pub fn export_pdf(document: &ReportDocument, dir: &Path) -> Result<PathBuf, CoreError> {
    let path = dir.join(PDF_REPORT_FILE);
    let bytes = pdf::render(document)?;
    replace_file(&path, &bytes).map_err(|err| export_error(&path, err))?;
    tracing::info!(
        path = %path.display(),
        pages = document.page_count(),
        "exported report as PDF"
    );
    Ok(path)
}

fn export_error(path: &Path, err: CoreError) -> CoreError {
    CoreError::Export(format!("{}: {err}", path.display()))
}
