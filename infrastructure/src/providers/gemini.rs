//! Gemini adapter: `models/{model}:generateContent` of the Generative
//! Language API, JSON response mode.

use super::error::{ProviderError, Result};
use async_trait::async_trait;
use footing_application::{AgentError, StatementAgent};
use footing_domain::core::string::truncate;
use footing_domain::{AgentProfile, AuditPromptTemplate, RawPayload, SectionKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "v1beta";

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
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
    /// Set on reasoning parts of thinking models
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// One extraction agent backed by the Gemini API.
pub struct GeminiAgent {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    profile: AgentProfile,
}

impl GeminiAgent {
    pub fn new(
        client: Client,
        base_url: &str,
        model: &str,
        api_key: &str,
        profile: AgentProfile,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            profile,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, API_VERSION, self.model
        )
    }

    fn request(&self, document_text: &str, section: SectionKind) -> GenerateContentRequest<'_> {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: AuditPromptTemplate::system().to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: AuditPromptTemplate::extraction_prompt(
                        section,
                        document_text,
                        &self.profile.approach,
                    ),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.profile.temperature,
                max_output_tokens: self.profile.max_tokens,
                response_mime_type: "application/json",
            },
        }
    }

    async fn generate(&self, document_text: &str, section: SectionKind) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey("gemini".to_string()));
        }

        let url = self.endpoint();
        debug!("{}: POST {}", self.profile.id, url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request(document_text, section))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(body.trim(), 300),
            });
        }

        let body = response.text().await?;
        parse_generate_content_response(&body)
    }
}

/// Concatenated answer text of the first candidate, reasoning parts skipped.
fn parse_generate_content_response(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| format!("blocked: {}", reason));
        return Err(ProviderError::EmptyResponse { reason });
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse {
            reason: candidate.finish_reason,
        });
    }
    Ok(text)
}

#[async_trait]
impl StatementAgent for GeminiAgent {
    fn agent_id(&self) -> &str {
        &self.profile.id
    }

    async fn extract(
        &self,
        document_text: &str,
        section: SectionKind,
    ) -> std::result::Result<RawPayload, AgentError> {
        let text = self.generate(document_text, section).await?;
        Ok(RawPayload::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footing_domain::default_profiles;

    fn agent() -> GeminiAgent {
        GeminiAgent::new(
            Client::new(),
            "https://generativelanguage.googleapis.com",
            "gemini-2.0-flash-thinking-exp",
            "test-key",
            default_profiles()[0].clone(),
        )
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            agent().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-thinking-exp:generateContent"
        );
    }

    #[test]
    fn test_request_body() {
        let agent = agent();
        let body =
            serde_json::to_value(agent.request("Pendapatan 500", SectionKind::IncomeStatement))
                .unwrap();

        assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Pendapatan 500")
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8000);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_parse_skips_thought_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [
                    {"text": "checking totals", "thought": true},
                    {"text": "{\"laporan_laba_rugi\": "},
                    {"text": "{}}"}
                ]},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(
            parse_generate_content_response(body).unwrap(),
            "{\"laporan_laba_rugi\": {}}"
        );
    }

    #[test]
    fn test_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let error = parse_generate_content_response(body).unwrap_err();
        assert!(error.to_string().contains("blocked: SAFETY"));
    }

    #[test]
    fn test_truncated_candidate() {
        let body = r#"{"candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]}"#;
        let error = parse_generate_content_response(body).unwrap_err();
        assert!(error.to_string().contains("MAX_TOKENS"));
    }
}
