//! Provider configuration from TOML (`[provider]` section)

use footing_domain::{ConfigIssue, ConfigIssueCode, ProviderKind, ProviderSettings};
use serde::{Deserialize, Serialize};

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [provider]
/// kind = "gemini"                  # "gemini" or "ollama"
/// model = "gemini-2.0-flash"
/// api_key_env = "GOOGLE_API_KEY"
/// request_timeout_secs = 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Provider name: "gemini" or "ollama"
    pub kind: String,
    /// Model name; the provider default when unset
    pub model: Option<String>,
    /// Endpoint base URL; the provider default when unset
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// HTTP request timeout
    pub request_timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default().as_str().to_string(),
            model: None,
            base_url: None,
            api_key_env: None,
            api_key: None,
            request_timeout_secs: 300,
        }
    }
}

impl FileProviderConfig {
    /// Resolve provider settings, reading the API key from the process environment.
    pub fn to_settings(&self) -> (ProviderSettings, Vec<ConfigIssue>) {
        self.to_settings_with(|name| std::env::var(name).ok())
    }

    /// Resolve provider settings with an explicit environment lookup.
    pub fn to_settings_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> (ProviderSettings, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let kind = match self.kind.parse::<ProviderKind>() {
            Ok(kind) => kind,
            Err(_) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider,
                    format!(
                        "provider.kind: unknown provider '{}' (expected gemini or ollama)",
                        self.kind
                    ),
                ));
                ProviderKind::default()
            }
        };

        let mut settings = ProviderSettings::for_kind(kind);
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            settings = settings.with_model(model.trim());
        }
        if let Some(base_url) = &self.base_url {
            settings = settings.with_base_url(base_url.trim_end_matches('/'));
        }

        let key_env = self
            .api_key_env
            .as_deref()
            .or(kind.default_api_key_env());
        let api_key = self.api_key.clone().or_else(|| key_env.and_then(&env));
        settings = settings.with_api_key(api_key);

        if kind.requires_api_key() && settings.api_key.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingApiKey,
                format!(
                    "provider {} needs an API key: set {} or pass --api-key",
                    kind,
                    key_env.unwrap_or("provider.api_key")
                ),
            ));
        }

        (settings, issues)
    }
}
