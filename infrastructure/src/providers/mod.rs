//! Model provider adapters implementing the agent gateway port.
//!
//! - [`OllamaAgent`]: local Ollama server, `/api/generate` in JSON mode
//! - [`GeminiAgent`]: Google Generative Language API, `generateContent`
//!
//! Both return the raw answer text; parsing and repair happen in the
//! domain normalizer.

pub mod error;
mod gateway;
mod gemini;
mod ollama;

pub use error::ProviderError;
pub use gateway::ProviderGateway;
pub use gemini::GeminiAgent;
pub use ollama::OllamaAgent;
