//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Numbers stay plain TOML floats and integers here; conversion into domain
//! types (and reporting of unusable values) happens in the `to_*` methods.

mod agent;
mod consensus;
mod output;
mod paths;
mod providers;

pub use agent::{FileAgentProfile, resolve_profiles};
pub use consensus::FileConsensusConfig;
pub use output::FileOutputConfig;
pub use paths::{FileBatchConfig, FileLoggingConfig, FilePathsConfig};
pub use providers::FileProviderConfig;

use footing_application::ConsensusConfig;
use footing_domain::{ConfigIssue, ConfigIssueCode, ProviderSettings};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Consensus engine settings
    pub consensus: FileConsensusConfig,
    /// Model provider settings
    pub provider: FileProviderConfig,
    /// Input and output directories
    pub paths: FilePathsConfig,
    /// Batch settings
    pub batch: FileBatchConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
    /// Console output settings
    pub output: FileOutputConfig,
    /// Agent profile overrides
    pub agents: Vec<FileAgentProfile>,
}

impl FileConfig {
    /// Engine configuration with agent profile overrides applied.
    ///
    /// Unusable values are replaced by defaults; [`validate`](Self::validate)
    /// reports them.
    pub fn consensus_config(&self) -> ConsensusConfig {
        let (config, _) = self.consensus.to_consensus_config();
        config.with_profiles(resolve_profiles(&self.agents))
    }

    /// Provider settings, API key resolved from the environment.
    pub fn provider_settings(&self) -> ProviderSettings {
        self.provider.to_settings().0
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks, in order:
    /// 1. Consensus values that cannot be converted (tolerances, sections)
    /// 2. Engine constraints (agent count, retry budget, loose tolerance)
    /// 3. Provider name and API key
    /// 4. Batch concurrency
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let (consensus, conversion_issues) = self.consensus.to_consensus_config();
        let engine_issues: Vec<ConfigIssue> = consensus
            .validate()
            .into_iter()
            .filter(|issue| !conversion_issues.iter().any(|seen| seen.code == issue.code))
            .collect();
        issues.extend(conversion_issues);
        issues.extend(engine_issues);

        issues.extend(self.provider.to_settings().1);

        if self.batch.concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidConcurrency,
                "batch.concurrency must be at least 1",
            ));
        }

        issues
    }
}
