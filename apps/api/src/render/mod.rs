// Report rendering: layout → PDF bytes → file on disk.
// The file is written through a temp file in the output directory and renamed
// into place, so a failed render never leaves a partial artifact behind.

pub mod pdf;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::layout::engine::layout_document;
use crate::layout::font_metrics::PageConfig;
use crate::layout::template::ReportTemplate;
use crate::report::models::ReportState;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("could not write report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Task(String),

    #[error("file name {0:?} cannot be sent as a download")]
    FileName(String),
}

/// The finished artifact.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// `report_<student_name>_<YYYYMMDD>.pdf`, spaces replaced by underscores.
/// Path separators, quotes and control characters are replaced too, so the
/// name stays inside the output directory and fits in a `Content-Disposition`
/// header.
pub fn report_file_name(student_name: &str, date: NaiveDate) -> String {
    let name: String = student_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | '"' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("report_{}_{}.pdf", name, date.format("%Y%m%d"))
}

/// Lays out, serializes and writes the report for one session.
pub fn render_report(
    template: &ReportTemplate,
    page: &PageConfig,
    state: &ReportState,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<RenderedReport, RenderError> {
    let document = layout_document(template, state, page);
    let bytes = pdf::write_pdf(&document)?;

    let file_name = report_file_name(&state.request.student_name, date);
    let path = write_atomically(output_dir, &file_name, &bytes)?;

    info!(
        "Rendered {} ({} page(s), {} bytes) for session {}",
        file_name,
        document.pages.len(),
        bytes.len(),
        state.session_id
    );

    Ok(RenderedReport {
        file_name,
        path,
        bytes,
    })
}

/// Runs `render_report` on the blocking pool.
pub async fn render_report_blocking(
    template: Arc<ReportTemplate>,
    page: PageConfig,
    state: ReportState,
    output_dir: PathBuf,
    date: NaiveDate,
) -> Result<RenderedReport, RenderError> {
    tokio::task::spawn_blocking(move || {
        render_report(&template, &page, &state, &output_dir, date)
    })
    .await
    .map_err(|e| RenderError::Task(e.to_string()))?
}

fn write_atomically(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    let path = dir.join(file_name);
    tmp.persist(&path).map_err(|e| RenderError::Io(e.error))?;
    Ok(path)
}
