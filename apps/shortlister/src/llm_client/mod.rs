/// LLM Client — the single point of entry for all Gemini API calls in the shortlister.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Callers depend on `analysis::AnalysisService`; this module provides the live implementation.
///
/// One request per analysis. No retries: a failed call is reported, and the user resubmits.
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::analysis::prompts::{build_prompt, PromptPayload};
use crate::analysis::schema::{analysis_schema, decode_analysis};
use crate::analysis::{AnalysisError, AnalysisRequest, AnalysisService};
use crate::models::analysis::AnalysisResult;

pub mod prompts;

/// Low randomness so repeated submissions of the same inputs score alike.
pub const TEMPERATURE: f32 = 0.2;
const RESPONSE_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unreadable API envelope: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types: request
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types: response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl LlmResponse {
    /// Concatenates the text parts of the first candidate. `None` when there is no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single Gemini client, constructed once in `main` and injected via `AppState`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, api_base: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            model,
            api_base,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Makes one call to `generateContent`, constraining output to `schema`.
    pub async fn call(&self, payload: &PromptPayload, schema: Value) -> Result<LlmResponse, LlmError> {
        let request_body = build_request(payload, schema);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let llm_response: LlmResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    /// Calls the API and returns the model's text with any markdown fences removed.
    pub async fn call_json_text(
        &self,
        payload: &PromptPayload,
        schema: Value,
    ) -> Result<String, LlmError> {
        let response = self.call(payload, schema).await?;
        let text = response.text().ok_or_else(|| {
            let finish = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            debug!("LLM returned no text (finish_reason={finish})");
            LlmError::EmptyContent
        })?;
        Ok(strip_json_fences(&text).to_string())
    }
}

#[async_trait]
impl AnalysisService for GeminiClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let payload = build_prompt(request);
        info!(
            "Requesting analysis: variant={}, candidates={}, model={}",
            request.candidates.variant(),
            request.candidates.len(),
            self.model
        );

        let text = self
            .call_json_text(&payload, analysis_schema())
            .await
            .map_err(|e| {
                error!("Error calling Gemini API: {e}");
                AnalysisError::Service(e)
            })?;

        decode_analysis(&text).map_err(|e| {
            error!("Gemini returned an unusable analysis: {e}");
            e
        })
    }
}

fn build_request(payload: &PromptPayload, schema: Value) -> GenerateContentRequest<'_> {
    let mut parts = vec![Part {
        text: Some(payload.instruction.as_str()),
        inline_data: None,
    }];
    parts.extend(payload.attachments.iter().map(|a| Part {
        text: None,
        inline_data: Some(InlineData {
            mime_type: a.mime_type.as_str(),
            data: base64::engine::general_purpose::STANDARD.encode(&a.bytes),
        }),
    }));

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: Some(prompts::JSON_ONLY_SYSTEM),
                inline_data: None,
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: RESPONSE_MIME_TYPE,
            response_schema: schema,
            temperature: TEMPERATURE,
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Attachment;
    use bytes::Bytes;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_request_body_text_only() {
        let payload = PromptPayload {
            instruction: "Rank these".to_string(),
            attachments: vec![],
        };
        let body = serde_json::to_value(build_request(&payload, analysis_schema())).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Rank these");
        assert!(body["contents"][0]["parts"][0].get("inlineData").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"][1],
            "candidateAnalyses"
        );
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("JSON"));
    }

    #[test]
    fn test_request_body_inlines_attachments_as_base64() {
        let payload = PromptPayload {
            instruction: "Rank these files".to_string(),
            attachments: vec![Attachment {
                filename: "alice.txt".to_string(),
                mime_type: "text/plain".to_string(),
                bytes: Bytes::from_static(b"Alice"),
            }],
        };
        let body = serde_json::to_value(build_request(&payload, analysis_schema())).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["inlineData"]["mimeType"], "text/plain");
        assert_eq!(parts[1]["inlineData"]["data"], "QWxpY2U=");
        assert!(parts[1].get("text").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": " 1}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        }"#;
        let response: LlmResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, Some(10));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: LlmResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(
            "key".to_string(),
            "gemini-2.5-flash".to_string(),
            "http://localhost:9000".to_string(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.model(), "gemini-2.5-flash");
    }

    // ── Live client against a local stand-in for the Gemini API ─────────────

    /// Serves `body` with `status` for the expected endpoint; anything else is a 404.
    async fn stub_gemini(status: u16, body: &'static str) -> GeminiClient {
        use axum::http::{header, HeaderMap, StatusCode, Uri};

        let app = axum::Router::new().fallback(move |uri: Uri, headers: HeaderMap| async move {
            let authorized = headers
                .get("x-goog-api-key")
                .is_some_and(|v| v == "test-key");
            if uri.path() != "/v1beta/models/gemini-test:generateContent" || !authorized {
                return (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, "text/plain")], "");
            }
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        GeminiClient::new(
            "test-key".to_string(),
            "gemini-test".to_string(),
            format!("http://{addr}"),
        )
        .unwrap()
    }

    fn one_candidate_request() -> AnalysisRequest {
        AnalysisRequest {
            job_description: "Backend Engineer".to_string(),
            candidates: crate::analysis::CandidateInputs::Text(vec![
                crate::analysis::CandidateProfile {
                    name: "A".to_string(),
                    resume: "Rust".to_string(),
                },
            ]),
        }
    }

    #[tokio::test]
    async fn test_rejected_key_maps_to_api_error_with_service_message() {
        let client = stub_gemini(
            401,
            r#"{"error":{"code":401,"message":"API key not valid. Please pass a valid API key.","status":"UNAUTHENTICATED"}}"#,
        )
        .await;

        let err = client.analyze(&one_candidate_request()).await.unwrap_err();
        match err {
            AnalysisError::Service(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "API key not valid. Please pass a valid API key.");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept_raw() {
        let client = stub_gemini(503, "upstream overloaded").await;

        let err = client.analyze(&one_candidate_request()).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Service(LlmError::Api { status: 503, ref message })
                if message == "upstream overloaded"
        ));
    }

    #[tokio::test]
    async fn test_no_candidates_maps_to_empty_content() {
        let client = stub_gemini(200, r#"{"candidates":[]}"#).await;

        let err = client.analyze(&one_candidate_request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Service(LlmError::EmptyContent)));
        assert!(!err.is_malformed());
    }

    #[tokio::test]
    async fn test_unparseable_envelope_is_a_service_failure() {
        let client = stub_gemini(200, "<html>not json</html>").await;

        let err = client.analyze(&one_candidate_request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Service(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fenced_text_missing_fields_is_malformed() {
        let client = stub_gemini(
            200,
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"```json\n{\"topCandidateName\":\"A\"}\n```"}]},"finishReason":"STOP"}]}"#,
        )
        .await;

        let err = client.analyze(&one_candidate_request()).await.unwrap_err();
        assert!(err.is_malformed(), "expected malformed, got {err:?}");
    }

    #[tokio::test]
    async fn test_fenced_valid_analysis_decodes() {
        let client = stub_gemini(
            200,
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"```json\n{\"topCandidateName\":\"A\",\"candidateAnalyses\":[{\"candidateName\":\"A\",\"suitabilityScore\":8,\"summary\":\"Solid.\",\"pros\":[\"Rust\"],\"cons\":[]}]}\n```"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":120,"candidatesTokenCount":40}}"#,
        )
        .await;

        let result = client.analyze(&one_candidate_request()).await.unwrap();
        assert_eq!(result.top_candidate_name, "A");
        assert_eq!(result.candidate_analyses[0].suitability_score, 8);
    }
}
