// Prompt assembly for candidate analysis.
// Two variants: candidate text embedded in the instruction, or one attachment per resume file.

use crate::analysis::{AnalysisRequest, Attachment, CandidateInputs, CandidateProfile};

/// Instruction plus any binary parts that travel with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub instruction: String,
    pub attachments: Vec<Attachment>,
}

const RECRUITER_PREAMBLE: &str = "You are an expert technical recruiter and hiring manager with years of experience. \
Your task is to analyze a list of candidates for a specific job role.

First, carefully review the provided job description to understand the key requirements, skills, and qualifications.";

/// Prose restatement of the output schema, sent alongside the structured declaration.
const OUTPUT_CONTRACT: &str = "Based on your analysis, provide a detailed evaluation for each candidate and identify the top candidate. \
Respond ONLY with a JSON object with exactly two fields: \"topCandidateName\" (the name of the single most suitable candidate) \
and \"candidateAnalyses\" (one entry per candidate with \"candidateName\", \"suitabilityScore\" as an integer from 1 to 10, \
\"summary\", \"pros\" and \"cons\"). Do not include any other text or markdown formatting.";

const FILE_NAMING_RULE: &str = "Each attached document is the resume of exactly one candidate. \
Extract the candidate's full name from their own document and use that extracted name, verbatim, \
as the \"candidateName\" value for that candidate. Produce the analyses in the same order as the attachments. \
\"topCandidateName\" must be exactly one of those extracted names.";

pub fn build_prompt(request: &AnalysisRequest) -> PromptPayload {
    match &request.candidates {
        CandidateInputs::Text(profiles) => PromptPayload {
            instruction: build_text_prompt(&request.job_description, profiles),
            attachments: vec![],
        },
        CandidateInputs::Files(files) => PromptPayload {
            instruction: build_file_prompt(&request.job_description, files.len()),
            attachments: files.clone(),
        },
    }
}

fn job_block(job_description: &str) -> String {
    format!("--- JOB DESCRIPTION ---\n{}\n--- END JOB DESCRIPTION ---", job_description.trim())
}

fn profile_block(profile: &CandidateProfile) -> String {
    format!(
        "--- CANDIDATE PROFILE ---\nName: {}\nResume/Profile Text:\n{}\n--- END CANDIDATE PROFILE ---",
        profile.name.trim(),
        profile.resume.trim()
    )
}

fn build_text_prompt(job_description: &str, profiles: &[CandidateProfile]) -> String {
    let candidate_profiles = profiles
        .iter()
        .map(profile_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{RECRUITER_PREAMBLE}\n\n{}\n\nNext, analyze each of the following candidate profiles against the job description.\n\n{candidate_profiles}\n\n{OUTPUT_CONTRACT}",
        job_block(job_description)
    )
}

fn build_file_prompt(job_description: &str, file_count: usize) -> String {
    format!(
        "{RECRUITER_PREAMBLE}\n\n{}\n\nNext, analyze each of the {file_count} attached resume documents against the job description.\n\n{FILE_NAMING_RULE}\n\n{OUTPUT_CONTRACT}",
        job_block(job_description)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn text_request() -> AnalysisRequest {
        AnalysisRequest {
            job_description: "Senior Backend Engineer".to_string(),
            candidates: CandidateInputs::Text(vec![
                CandidateProfile {
                    name: "Alice".to_string(),
                    resume: "10 years of Rust and distributed systems.".to_string(),
                },
                CandidateProfile {
                    name: "Bob".to_string(),
                    resume: "Summer internship in marketing.".to_string(),
                },
            ]),
        }
    }

    #[test]
    fn test_text_prompt_embeds_job_and_profiles_in_order() {
        let payload = build_prompt(&text_request());
        let p = &payload.instruction;
        assert!(payload.attachments.is_empty());
        assert!(p.contains("--- JOB DESCRIPTION ---\nSenior Backend Engineer\n--- END JOB DESCRIPTION ---"));
        let alice = p.find("Name: Alice").unwrap();
        let bob = p.find("Name: Bob").unwrap();
        assert!(alice < bob);
        assert_eq!(p.matches("--- CANDIDATE PROFILE ---").count(), 2);
        assert_eq!(p.matches("--- END CANDIDATE PROFILE ---").count(), 2);
        assert!(p.contains("10 years of Rust"));
    }

    #[test]
    fn test_text_prompt_states_output_contract() {
        let p = build_prompt(&text_request()).instruction;
        assert!(p.contains("topCandidateName"));
        assert!(p.contains("candidateAnalyses"));
        assert!(p.contains("Respond ONLY with a JSON object"));
    }

    #[test]
    fn test_file_prompt_carries_attachments_not_text() {
        let request = AnalysisRequest {
            job_description: "Product Manager".to_string(),
            candidates: CandidateInputs::Files(vec![
                Attachment {
                    filename: "alice.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    bytes: Bytes::from_static(b"%PDF-1.7"),
                },
                Attachment {
                    filename: "bob.txt".to_string(),
                    mime_type: "text/plain".to_string(),
                    bytes: Bytes::from_static(b"Bob Builder"),
                },
            ]),
        };
        let payload = build_prompt(&request);
        assert_eq!(payload.attachments.len(), 2);
        assert_eq!(payload.attachments[0].filename, "alice.pdf");
        assert!(!payload.instruction.contains("--- CANDIDATE PROFILE ---"));
        assert!(payload.instruction.contains("2 attached resume documents"));
        assert!(payload.instruction.contains("verbatim"));
        assert!(payload.instruction.contains("Product Manager"));
    }
}
