//! Ollama adapter: `POST /api/generate` in JSON mode.

use super::error::{ProviderError, Result};
use async_trait::async_trait;
use footing_application::{AgentError, StatementAgent};
use footing_domain::core::string::truncate;
use footing_domain::{AgentProfile, AuditPromptTemplate, RawPayload, SectionKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: String,
    /// Constrains the output to a JSON value
    format: &'static str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
}

/// One extraction agent backed by a local Ollama server.
pub struct OllamaAgent {
    client: Client,
    base_url: String,
    model: String,
    profile: AgentProfile,
}

impl OllamaAgent {
    pub fn new(client: Client, base_url: &str, model: &str, profile: AgentProfile) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            profile,
        }
    }

    fn request<'a>(&'a self, document_text: &str, section: SectionKind) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            system: AuditPromptTemplate::system(),
            prompt: AuditPromptTemplate::extraction_prompt(
                section,
                document_text,
                &self.profile.approach,
            ),
            format: "json",
            stream: false,
            options: GenerateOptions {
                temperature: self.profile.temperature,
                num_predict: self.profile.max_tokens,
            },
        }
    }

    async fn generate(&self, document_text: &str, section: SectionKind) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("{}: POST {} (model {})", self.profile.id, url, self.model);

        let response = self
            .client
            .post(&url)
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
        parse_generate_response(&body)
    }
}

fn parse_generate_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;
    if parsed.response.trim().is_empty() {
        return Err(ProviderError::EmptyResponse {
            reason: parsed.done_reason,
        });
    }
    Ok(parsed.response)
}

#[async_trait]
impl StatementAgent for OllamaAgent {
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
