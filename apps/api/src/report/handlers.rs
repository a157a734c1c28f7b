//! Axum route handlers for the Report API.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::{render_report_blocking, report_file_name, RenderError};
use crate::report::models::{ReportRequest, ReportState, TaskList, TaskSection};
use crate::report::pipeline::generate_report;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// What the client sees of a session: the drafted lists plus enough metadata
/// to show the form again.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    pub hours: String,
    pub work_done: TaskList,
    pub plans: TaskList,
}

impl From<ReportState> for SessionView {
    fn from(state: ReportState) -> Self {
        SessionView {
            session_id: state.session_id,
            created_at: state.created_at,
            student_name: state.request.student_name,
            hours: state.request.hours,
            work_done: state.work_done,
            plans: state.plans,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditTaskRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports/generate
///
/// Validates the form, drafts both task lists and opens an edit session.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<SessionView>, AppError> {
    let report = generate_report(state.generator.as_ref(), request).await?;
    state.sessions.insert(report.clone()).await;
    Ok(Json(report.into()))
}

/// GET /api/v1/reports/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.get(session_id).await?.into()))
}

/// PUT /api/v1/reports/:session_id/:section/:index
///
/// Replaces one drafted item. `index` is 1-based, matching "Task 1", "Plan 1".
pub async fn handle_edit_task(
    State(state): State<AppState>,
    Path((session_id, section, index)): Path<(Uuid, TaskSection, usize)>,
    Json(request): Json<EditTaskRequest>,
) -> Result<Json<SessionView>, AppError> {
    let updated = state
        .sessions
        .edit_task(session_id, section, index, &request.text)
        .await?;
    Ok(Json(updated.into()))
}

/// POST /api/v1/reports/:session_id/finalize
///
/// Renders the PDF, writes it to the output directory and returns it as a
/// download. The session is cleared only after the file is in place; on
/// failure it is left as it was so the user can try again. An edit that lands
/// while the PDF is being rendered is kept and reported as a conflict.
pub async fn handle_finalize(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.sessions.get(session_id).await?;

    let date = Local::now().date_naive();
    let file_name = report_file_name(&report.request.student_name, date);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|_| RenderError::FileName(file_name.clone()))?;

    let rendered = render_report_blocking(
        state.template.clone(),
        state.page_config.clone(),
        report.clone(),
        state.config.output_dir.clone(),
        date,
    )
    .await?;

    let mut finished = state.sessions.remove_if_unchanged(&report).await?;
    finished.output_file = Some(rendered.file_name.clone());
    info!(
        "Report session {} finalized as {} ({})",
        finished.session_id,
        finished.output_file.as_deref().unwrap_or_default(),
        rendered.path.display()
    );

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(rendered.bytes),
    ))
}

/// DELETE /api/v1/reports/:session_id
///
/// Discards a session without rendering.
pub async fn handle_discard(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
