//! Analysis — the contract with the external AI service that scores candidates.
//!
//! `AppState` holds an `Arc<dyn AnalysisService>`; the Gemini-backed implementation
//! lives in `llm_client`, tests swap in a canned one.

pub mod prompts;
pub mod ranking;
pub mod schema;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::analysis::AnalysisResult;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// A typed-in candidate as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub resume: String,
}

/// One resume file forwarded verbatim, tagged with its declared MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateInputs {
    Text(Vec<CandidateProfile>),
    Files(Vec<Attachment>),
}

impl CandidateInputs {
    pub fn len(&self) -> usize {
        match self {
            CandidateInputs::Text(profiles) => profiles.len(),
            CandidateInputs::Files(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn variant(&self) -> &'static str {
        match self {
            CandidateInputs::Text(_) => "text",
            CandidateInputs::Files(_) => "files",
        }
    }
}

/// Ephemeral snapshot of everything one submission sends out.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub candidates: CandidateInputs,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to get analysis from AI. Please check the server logs for more details.";

pub const MALFORMED_FAILURE_MESSAGE: &str =
    "The AI returned a response that could not be parsed. Please try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The call itself failed: network, auth, rate limiting, empty reply.
    #[error("analysis service call failed: {0}")]
    Service(#[from] LlmError),

    /// The call succeeded but the payload did not match the output schema.
    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

impl AnalysisError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, AnalysisError::Malformed(_))
    }

    /// Message safe to show to the user. Service failures stay opaque.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::Service(_) => GENERIC_FAILURE_MESSAGE,
            AnalysisError::Malformed(_) => MALFORMED_FAILURE_MESSAGE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// One call in, one complete result out. No retry, no streaming, no partial results.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_share_one_message() {
        let empty = AnalysisError::Service(LlmError::EmptyContent);
        let api = AnalysisError::Service(LlmError::Api {
            status: 401,
            message: "API key not valid".to_string(),
        });
        assert_eq!(empty.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(api.user_message(), GENERIC_FAILURE_MESSAGE);
        assert!(!api.is_malformed());
    }

    #[test]
    fn test_malformed_is_distinguishable() {
        let err = AnalysisError::Malformed("missing field `candidateAnalyses`".to_string());
        assert!(err.is_malformed());
        assert_eq!(err.user_message(), MALFORMED_FAILURE_MESSAGE);
    }

    #[test]
    fn test_candidate_inputs_len_and_variant() {
        let text = CandidateInputs::Text(vec![CandidateProfile {
            name: "Alice".to_string(),
            resume: "Rust".to_string(),
        }]);
        assert_eq!(text.len(), 1);
        assert_eq!(text.variant(), "text");
        assert_eq!(CandidateInputs::Files(vec![]).variant(), "files");
    }
}
