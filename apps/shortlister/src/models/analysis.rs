use serde::{Deserialize, Serialize};

/// Per-candidate evaluation as returned by the analysis service.
/// Every field is required; `suitability_score` is nominally 1–10 but not range-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnalysis {
    pub candidate_name: String,
    pub suitability_score: i64,
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Full analysis payload. `top_candidate_name` is expected to match one
/// `candidate_name` exactly, but nothing local enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub top_candidate_name: String,
    pub candidate_analyses: Vec<CandidateAnalysis>,
}
