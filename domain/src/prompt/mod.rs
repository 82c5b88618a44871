//! Prompt templates for extraction agents

mod template;

pub use template::AuditPromptTemplate;
