//! Output schema declaration and the strict decode step for service replies.

use serde_json::{json, Value};

use crate::analysis::AnalysisError;
use crate::models::analysis::AnalysisResult;

/// Response schema in the OpenAPI subset Gemini accepts for `responseSchema`.
/// Every property listed here is required.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topCandidateName": {
                "type": "STRING",
                "description": "The name of the single most suitable candidate from the list."
            },
            "candidateAnalyses": {
                "type": "ARRAY",
                "description": "An array containing the detailed analysis for each candidate.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "candidateName": {
                            "type": "STRING",
                            "description": "The name of the candidate being analyzed."
                        },
                        "suitabilityScore": {
                            "type": "INTEGER",
                            "description": "A score from 1 (not suitable) to 10 (perfect fit) indicating suitability for the role."
                        },
                        "summary": {
                            "type": "STRING",
                            "description": "A brief one or two-sentence summary of the candidate's fit for the role."
                        },
                        "pros": {
                            "type": "ARRAY",
                            "description": "A list of key strengths and matching qualifications.",
                            "items": { "type": "STRING" }
                        },
                        "cons": {
                            "type": "ARRAY",
                            "description": "A list of potential weaknesses, gaps, or areas of concern.",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["candidateName", "suitabilityScore", "summary", "pros", "cons"]
                }
            }
        },
        "required": ["topCandidateName", "candidateAnalyses"]
    })
}

/// Decodes the service's JSON text into a typed result.
///
/// Anything short of a complete, well-typed document is `Malformed`; there is
/// no partially populated result.
pub fn decode_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let result: AnalysisResult =
        serde_json::from_str(text).map_err(|e| AnalysisError::Malformed(e.to_string()))?;

    if result.top_candidate_name.trim().is_empty() {
        return Err(AnalysisError::Malformed(
            "topCandidateName is empty".to_string(),
        ));
    }

    Ok(result)
}
