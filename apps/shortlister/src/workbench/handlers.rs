//! Axum route handlers for the Workbench API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::analysis::ranking::RankedResults;
use crate::catalog::{JobDescription, JOB_CATALOG};
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateField};
use crate::state::AppState;
use crate::workbench::candidates::JobInput;
use crate::workbench::session::{submit, InputMode, WorkbenchSnapshot};
use crate::workbench::staging::{DragEvent, IncomingFile, StagedFileView};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: InputMode,
}

#[derive(Debug, Deserialize)]
pub struct CandidateUpdateRequest {
    pub field: CandidateField,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct CandidateCreatedResponse {
    pub candidate: Candidate,
}

/// Where an upload came from. Drops also clear the drag indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadSource {
    #[default]
    Picker,
    Drop,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub source: UploadSource,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSignal {
    Enter,
    Over,
    Leave,
}

impl From<DragSignal> for DragEvent {
    fn from(signal: DragSignal) -> Self {
        match signal {
            DragSignal::Enter => DragEvent::Enter,
            DragSignal::Over => DragEvent::Over,
            DragSignal::Leave => DragEvent::Leave,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub event: DragSignal,
}

#[derive(Debug, Serialize)]
pub struct DragStateResponse {
    pub prevent_default: bool,
    pub is_dragging: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub added: usize,
    pub skipped_duplicates: usize,
    pub staged_files: Vec<StagedFileView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs() -> Json<&'static [JobDescription]> {
    Json(JOB_CATALOG)
}

/// GET /api/v1/workbench
pub async fn handle_get_workbench(State(state): State<AppState>) -> Json<WorkbenchSnapshot> {
    Json(state.workbench.lock().await.snapshot())
}

/// PUT /api/v1/workbench/job
pub async fn handle_set_job(
    State(state): State<AppState>,
    Json(job): Json<JobInput>,
) -> Result<StatusCode, AppError> {
    state.workbench.lock().await.set_job(job)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/workbench/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(req): Json<ModeRequest>,
) -> StatusCode {
    state.workbench.lock().await.set_mode(req.mode);
    StatusCode::NO_CONTENT
}

/// POST /api/v1/workbench/candidates
pub async fn handle_add_candidate(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CandidateCreatedResponse>), AppError> {
    let mut workbench = state.workbench.lock().await;
    let id = workbench.add_candidate();
    let candidate = workbench
        .candidates()
        .as_slice()
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("candidate {id} vanished after add")))?;
    Ok((StatusCode::CREATED, Json(CandidateCreatedResponse { candidate })))
}

/// PATCH /api/v1/workbench/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CandidateUpdateRequest>,
) -> Result<StatusCode, AppError> {
    state
        .workbench
        .lock()
        .await
        .update_candidate(id, req.field, req.value)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/workbench/candidates/:id
pub async fn handle_remove_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.workbench.lock().await.remove_candidate(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/workbench/drag
pub async fn handle_drag(
    State(state): State<AppState>,
    Json(req): Json<DragRequest>,
) -> Json<DragStateResponse> {
    let mut workbench = state.workbench.lock().await;
    let response = workbench.handle_drag(req.event.into());
    Json(DragStateResponse {
        prevent_default: response.prevent_default,
        is_dragging: workbench.stager().is_dragging(),
    })
}

/// POST /api/v1/workbench/files[?source=drop]
///
/// Multipart upload; every part with a filename is staged. Duplicates by
/// (filename, size) are dropped silently and reported only as a count.
pub async fn handle_upload_files(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut incoming = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Ignoring multipart field without a filename: {:?}", field.name());
            continue;
        };
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;
        incoming.push(IncomingFile {
            filename,
            mime_type,
            bytes,
        });
    }

    if incoming.is_empty() {
        return Err(AppError::Validation("No files found in upload".to_string()));
    }

    let received = incoming.len();
    let mut workbench = state.workbench.lock().await;
    let added = match query.source {
        UploadSource::Picker => workbench.stage_files(incoming),
        UploadSource::Drop => workbench.handle_drag(DragEvent::Drop(incoming)).added,
    }
    .len();
    debug!(
        "Staged {added} of {received} uploaded file(s); {} staged in total",
        workbench.stager().len()
    );

    Ok(Json(UploadResponse {
        added,
        skipped_duplicates: received - added,
        staged_files: workbench.stager().views(),
    }))
}

/// DELETE /api/v1/workbench/files/:id
pub async fn handle_remove_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.workbench.lock().await.unstage_file(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/workbench/analyze
///
/// Validates the workbench, makes the single analysis call, and returns the
/// ranked cards. 409 while another analysis is still running.
pub async fn handle_analyze(State(state): State<AppState>) -> Result<Json<RankedResults>, AppError> {
    let ranked = submit(state.workbench.clone(), state.analyzer.clone()).await?;
    Ok(Json(ranked))
}
