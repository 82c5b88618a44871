//! Consensus configuration from TOML (`[consensus]` section)

use footing_application::ConsensusConfig;
use footing_domain::{ConfigIssue, ConfigIssueCode, FootingPolicy, SectionKind, Tolerance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Raw consensus configuration from TOML
///
/// # Example
///
/// ```toml
/// [consensus]
/// tolerance = 0.0001          # relative agreement tolerance (0.01%)
/// max_retries = 2             # rounds after the first
/// agent_count = 3
/// agent_timeout_secs = 180    # 0 disables the per-agent timeout
/// retry_delay_ms = 1000
/// footing_tolerance = 1.0     # |computed - reported| below this is OK
/// balance_tolerance = 0.01
/// sections = ["balance_sheet", "income_statement", "cash_flow"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    pub tolerance: f64,
    pub max_retries: usize,
    pub agent_count: usize,
    pub agent_timeout_secs: u64,
    pub retry_delay_ms: u64,
    pub footing_tolerance: f64,
    pub balance_tolerance: f64,
    pub sections: Vec<String>,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0001,
            max_retries: 2,
            agent_count: 3,
            agent_timeout_secs: 180,
            retry_delay_ms: 1000,
            footing_tolerance: 1.0,
            balance_tolerance: 0.01,
            sections: SectionKind::ALL
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
        }
    }
}

impl FileConsensusConfig {
    /// Build the engine configuration, collecting issues for unusable values.
    ///
    /// Unusable values fall back to their defaults; the returned issues are
    /// errors, so callers refuse to start when any are present.
    pub fn to_consensus_config(&self) -> (ConsensusConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let tolerance = match Tolerance::from_f64(self.tolerance) {
            Ok(tolerance) => tolerance,
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidTolerance,
                    format!("consensus.tolerance: {}", e),
                ));
                Tolerance::DEFAULT
            }
        };

        let defaults = FootingPolicy::default();
        let policy = FootingPolicy {
            footing_tolerance: self
                .parse_amount_tolerance("footing_tolerance", self.footing_tolerance, &mut issues)
                .unwrap_or(defaults.footing_tolerance),
            balance_tolerance: self
                .parse_amount_tolerance("balance_tolerance", self.balance_tolerance, &mut issues)
                .unwrap_or(defaults.balance_tolerance),
        };

        let mut sections = Vec::new();
        for name in &self.sections {
            match name.parse::<SectionKind>() {
                Ok(kind) if !sections.contains(&kind) => sections.push(kind),
                Ok(_) => {}
                Err(_) => issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownSection,
                    format!(
                        "consensus.sections: unknown section '{}' (expected balance_sheet, income_statement or cash_flow)",
                        name
                    ),
                )),
            }
        }

        let timeout =
            (self.agent_timeout_secs > 0).then(|| Duration::from_secs(self.agent_timeout_secs));

        let config = ConsensusConfig::default()
            .with_tolerance(tolerance)
            .with_max_retries(self.max_retries)
            .with_agent_count(self.agent_count)
            .with_agent_timeout(timeout)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_policy(policy)
            .with_sections(sections);

        (config, issues)
    }

    fn parse_amount_tolerance(
        &self,
        field: &str,
        value: f64,
        issues: &mut Vec<ConfigIssue>,
    ) -> Option<Decimal> {
        let parsed = value
            .is_finite()
            .then(|| Decimal::from_str(&value.to_string()).ok())
            .flatten()
            .filter(|decimal| !decimal.is_sign_negative() || decimal.is_zero());
        if parsed.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidFootingTolerance,
                format!("consensus.{}: {} is not a non-negative amount", field, value),
            ));
        }
        parsed
    }
}
