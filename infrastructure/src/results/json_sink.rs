//! Audit files on the local filesystem
//!
//! One pretty-printed JSON file per company:
//! `<output_dir>/<COMPANY>_<provider>_triple_agent_results.json`
//! (`<N>_agent` instead of `triple_agent` for other agent counts).

use async_trait::async_trait;
use footing_application::{ResultSink, SinkError};
use footing_domain::CompanyAudit;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File an audit is written to.
    pub fn result_path(&self, audit: &CompanyAudit) -> PathBuf {
        let run = audit.run();
        let provider = run.provider.as_deref().unwrap_or("unknown");
        let system = match run.agent_count {
            3 => "triple_agent".to_string(),
            n => format!("{}_agent", n),
        };
        self.output_dir.join(format!(
            "{}_{}_{}_results.json",
            audit.company(),
            provider,
            system
        ))
    }
}

#[async_trait]
impl ResultSink for JsonFileSink {
    async fn store(&self, audit: &CompanyAudit) -> Result<String, SinkError> {
        let json =
            serde_json::to_string_pretty(audit).map_err(|e| SinkError::Serialize(e.to_string()))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| SinkError::Io {
                location: self.output_dir.display().to_string(),
                source,
            })?;

        let path = self.result_path(audit);
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| SinkError::Io {
                location: path.display().to_string(),
                source,
            })?;

        debug!("Wrote {}", path.display());
        Ok(path.display().to_string())
    }
}
