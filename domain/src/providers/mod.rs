//! Provider configuration types (provider-neutral, serde-free).
//!
//! These types define the shape of provider settings without depending
//! on any serialization format (TOML, JSON, etc.).

use crate::core::error::DomainError;
use std::str::FromStr;

/// Model provider backing the extraction agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// Google Generative Language API.
    Gemini,
    /// Local Ollama server.
    #[default]
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Ollama => "qwen3:4b",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    /// Environment variable holding the API key, if the provider needs one.
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GOOGLE_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.default_api_key_env().is_some()
    }

    /// Map a short model alias to the provider's model id.
    pub fn resolve_model(&self, name: &str) -> String {
        match (self, name) {
            (ProviderKind::Gemini, "gemini-2.0-flash") => "gemini-2.0-flash-thinking-exp".to_string(),
            _ => name.to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" | "google_gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(DomainError::UnknownProvider(s.to_string())),
        }
    }
}

/// Resolved settings for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Model id as sent to the provider.
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderSettings {
    /// Defaults for `kind`, without an API key.
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            kind,
            model: kind.resolve_model(kind.default_model()),
            base_url: kind.default_base_url().to_string(),
            api_key: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = self.kind.resolve_model(model);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::for_kind(ProviderKind::default())
    }
}
