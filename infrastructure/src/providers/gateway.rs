//! [`AgentGateway`] over the configured model provider.

use super::error::{ProviderError, Result};
use super::gemini::GeminiAgent;
use super::ollama::OllamaAgent;
use footing_application::{AgentGateway, StatementAgent};
use footing_domain::{AgentProfile, ProviderKind, ProviderSettings};
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// Creates HTTP-backed agents for one provider and model.
///
/// All agents share one connection pool.
pub struct ProviderGateway {
    settings: ProviderSettings,
    client: Client,
}

impl ProviderGateway {
    pub fn new(settings: ProviderSettings, request_timeout: Duration) -> Result<Self> {
        if settings.kind.requires_api_key() && settings.api_key.is_none() {
            return Err(ProviderError::MissingApiKey(settings.kind.to_string()));
        }

        let client = Client::builder().timeout(request_timeout).build()?;
        info!(
            "Using {} model {} at {}",
            settings.kind, settings.model, settings.base_url
        );
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }
}

impl AgentGateway for ProviderGateway {
    fn create_agent(&self, profile: &AgentProfile) -> Box<dyn StatementAgent> {
        let settings = &self.settings;
        match settings.kind {
            ProviderKind::Gemini => Box::new(GeminiAgent::new(
                self.client.clone(),
                &settings.base_url,
                &settings.model,
                settings.api_key.as_deref().unwrap_or_default(),
                profile.clone(),
            )),
            ProviderKind::Ollama => Box::new(OllamaAgent::new(
                self.client.clone(),
                &settings.base_url,
                &settings.model,
                profile.clone(),
            )),
        }
    }

    fn provider_name(&self) -> &str {
        self.settings.kind.as_str()
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
