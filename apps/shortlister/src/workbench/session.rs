//! Workbench — the single in-memory state container behind the UI, and the
//! submission state machine: Idle → Validating → Submitting → Idle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::ranking::{rank, RankedResults};
use crate::analysis::{
    AnalysisError, AnalysisRequest, AnalysisService, Attachment, CandidateInputs,
    CandidateProfile, GENERIC_FAILURE_MESSAGE,
};
use crate::catalog::find_job;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::candidate::{Candidate, CandidateField};
use crate::workbench::candidates::{CandidateList, JobInput};
use crate::workbench::staging::{DragEvent, DragResponse, FileStager, IncomingFile, StagedFileView};

pub const MANUAL_VALIDATION_MESSAGE: &str =
    "Please fill in the job description and all candidate details.";
pub const FILES_VALIDATION_MESSAGE: &str =
    "Please provide a job description and upload at least one resume file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Manual,
    Files,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    /// Transient: entered and left under a single lock hold inside
    /// `begin_submission`, so snapshots never report it.
    Validating,
    Submitting,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("An analysis is already in progress")]
    Busy,

    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("At least one candidate is required")]
    LastCandidate,

    #[error("Candidate {0} not found")]
    CandidateNotFound(Uuid),

    #[error("Staged file {0} not found")]
    FileNotFound(Uuid),

    #[error("Unknown job description '{0}'")]
    UnknownJob(String),
}

/// Serializable view of the whole workbench.
#[derive(Debug, Clone, Serialize)]
pub struct WorkbenchSnapshot {
    pub mode: InputMode,
    pub job: JobInput,
    pub candidates: Vec<Candidate>,
    pub can_remove_candidate: bool,
    pub staged_files: Vec<StagedFileView>,
    pub is_dragging: bool,
    pub phase: Phase,
    pub result: Option<RankedResults>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct Workbench {
    mode: InputMode,
    job: JobInput,
    candidates: CandidateList,
    stager: FileStager,
    phase: Phase,
    result: Option<RankedResults>,
    error: Option<String>,
    in_flight_files: Vec<Uuid>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Inputs ──────────────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn set_job(&mut self, job: JobInput) -> Result<(), EditError> {
        if let JobInput::Catalog(id) = &job {
            if find_job(id).is_none() {
                return Err(EditError::UnknownJob(id.clone()));
            }
        }
        self.job = job;
        Ok(())
    }

    pub fn add_candidate(&mut self) -> Uuid {
        self.candidates.add()
    }

    pub fn update_candidate(
        &mut self,
        id: Uuid,
        field: CandidateField,
        value: String,
    ) -> Result<(), EditError> {
        if self.candidates.update(id, field, value) {
            Ok(())
        } else {
            Err(EditError::CandidateNotFound(id))
        }
    }

    /// Removes a candidate unless it is the last one left.
    pub fn remove_candidate(&mut self, id: Uuid) -> Result<(), EditError> {
        if !self.candidates.contains(id) {
            return Err(EditError::CandidateNotFound(id));
        }
        if !self.candidates.can_remove() {
            return Err(EditError::LastCandidate);
        }
        self.candidates.remove(id);
        Ok(())
    }

    pub fn stage_files(&mut self, files: Vec<IncomingFile>) -> Vec<Uuid> {
        self.stager.add(files)
    }

    /// Drag indicator updates; a drop stages its files like an upload.
    pub fn handle_drag(&mut self, event: DragEvent) -> DragResponse {
        self.stager.handle_drag(event)
    }

    pub fn unstage_file(&mut self, id: Uuid) -> Result<(), EditError> {
        self.stager
            .remove(id)
            .map(|_| ())
            .ok_or(EditError::FileNotFound(id))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&RankedResults> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stager(&self) -> &FileStager {
        &self.stager
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn snapshot(&self) -> WorkbenchSnapshot {
        WorkbenchSnapshot {
            mode: self.mode,
            job: self.job.clone(),
            candidates: self.candidates.as_slice().to_vec(),
            can_remove_candidate: self.candidates.can_remove(),
            staged_files: self.stager.views(),
            is_dragging: self.stager.is_dragging(),
            phase: self.phase,
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }

    // ── Submission ──────────────────────────────────────────────────────────

    /// Idle → Validating → Submitting. On a validation failure the workbench
    /// returns to Idle with the error recorded and no request is produced.
    pub fn begin_submission(&mut self) -> Result<AnalysisRequest, SubmitError> {
        if self.phase != Phase::Idle {
            return Err(SubmitError::Busy);
        }
        self.phase = Phase::Validating;

        match self.build_request() {
            Ok(request) => {
                self.phase = Phase::Submitting;
                self.result = None;
                self.error = None;
                Ok(request)
            }
            Err(message) => {
                self.phase = Phase::Idle;
                self.error = Some(message.clone());
                Err(SubmitError::Validation(message))
            }
        }
    }

    /// Submitting → Idle, recording either the ranked result or the failure.
    pub fn complete_submission(
        &mut self,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<RankedResults, AnalysisError> {
        self.phase = Phase::Idle;
        let submitted_files = std::mem::take(&mut self.in_flight_files);

        match outcome {
            Ok(result) => {
                let ranked = rank(&result);
                self.stager.remove_all(&submitted_files);
                self.result = Some(ranked.clone());
                self.error = None;
                Ok(ranked)
            }
            Err(e) => {
                self.result = None;
                self.error = Some(format!("An error occurred: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// Submitting → Idle when the call never reported back (the task running it
    /// died). Files stay staged and the generic failure message is shown.
    pub fn abort_submission(&mut self) {
        self.phase = Phase::Idle;
        self.in_flight_files.clear();
        self.result = None;
        self.error = Some(format!("An error occurred: {GENERIC_FAILURE_MESSAGE}"));
    }

    fn build_request(&mut self) -> Result<AnalysisRequest, String> {
        let job_description = self
            .job
            .resolve()
            .filter(|text| !text.trim().is_empty());

        match self.mode {
            InputMode::Manual => {
                let candidates = self.candidates.as_slice();
                let complete = !candidates.is_empty() && candidates.iter().all(Candidate::is_complete);
                let job_description = match job_description {
                    Some(text) if complete => text,
                    _ => return Err(MANUAL_VALIDATION_MESSAGE.to_string()),
                };
                let profiles = candidates
                    .iter()
                    .map(|c| CandidateProfile {
                        name: c.name.clone(),
                        resume: c.resume_text.clone(),
                    })
                    .collect();
                Ok(AnalysisRequest {
                    job_description,
                    candidates: CandidateInputs::Text(profiles),
                })
            }
            InputMode::Files => {
                let job_description = match job_description {
                    Some(text) if !self.stager.is_empty() => text,
                    _ => return Err(FILES_VALIDATION_MESSAGE.to_string()),
                };
                let files = self.stager.files();
                self.in_flight_files = files.iter().map(|f| f.id).collect();
                let attachments = files
                    .iter()
                    .map(|f| Attachment {
                        filename: f.filename.clone(),
                        mime_type: f.mime_type.clone(),
                        bytes: f.bytes.clone(),
                    })
                    .collect();
                Ok(AnalysisRequest {
                    job_description,
                    candidates: CandidateInputs::Files(attachments),
                })
            }
        }
    }
}

/// Runs one full submission against `analyzer`.
///
/// The lock is released for the duration of the external call, so the
/// workbench stays readable; a second submit meanwhile is rejected as busy.
/// The call and the completion step run on their own task, so a caller that
/// goes away mid-request does not leave the workbench stuck in `Submitting`.
pub async fn submit(
    workbench: Arc<Mutex<Workbench>>,
    analyzer: Arc<dyn AnalysisService>,
) -> Result<RankedResults, AppError> {
    let request = {
        let mut guard = workbench.lock().await;
        guard.begin_submission().map_err(|e| {
            warn!("Submission rejected: {e}");
            e
        })?
    };

    info!(
        "Submitting {} candidate(s) for analysis ({} input)",
        request.candidates.len(),
        request.candidates.variant()
    );

    let task = tokio::spawn({
        let workbench = Arc::clone(&workbench);
        async move {
            let outcome = analyzer.analyze(&request).await;
            let mut guard = workbench.lock().await;
            guard.complete_submission(outcome)
        }
    });

    let ranked = match task.await {
        Ok(outcome) => outcome?,
        Err(e) => {
            error!("Analysis task did not finish: {e}");
            workbench.lock().await.abort_submission();
            return Err(AppError::Internal(anyhow::anyhow!(
                "analysis task did not finish: {e}"
            )));
        }
    };

    info!(
        "Analysis complete: {} card(s), top pick {:?}",
        ranked.cards.len(),
        ranked.top_pick().map(|c| c.candidate_name.as_str())
    );
    Ok(ranked)
}
