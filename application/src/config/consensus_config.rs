//! Consensus configuration: engine parameters.
//!
//! [`ConsensusConfig`] is threaded into
//! [`RunConsensusUseCase`](crate::use_cases::run_consensus::RunConsensusUseCase)
//! at construction and is read-only while the engine runs.

use footing_domain::{
    AgentProfile, ConfigIssue, ConfigIssueCode, FootingPolicy, SectionKind, Severity, Tolerance,
    default_profiles, profiles_for,
};
use rust_decimal::Decimal;
use std::time::Duration;

/// Retry budget above which a warning is raised.
const LARGE_RETRY_BUDGET: usize = 5;

/// Consensus engine parameters.
#[derive(Debug, Clone)]
pub struct ConsensusConfig {
    /// Relative tolerance for agreement between agents.
    pub tolerance: Tolerance,
    /// Rounds allowed after the first one.
    pub max_retries: usize,
    /// Agents per round (N).
    pub agent_count: usize,
    /// Deadline for one agent invocation.
    pub agent_timeout: Option<Duration>,
    /// Pause before a retry round.
    pub retry_delay: Duration,
    /// Footing and balancing thresholds for the final data.
    pub policy: FootingPolicy,
    /// Base agent profiles, cycled when `agent_count` exceeds them.
    pub profiles: Vec<AgentProfile>,
    /// Statements audited per company, in order.
    pub sections: Vec<SectionKind>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DEFAULT,
            max_retries: 2,
            agent_count: 3,
            agent_timeout: Some(Duration::from_secs(180)),
            retry_delay: Duration::from_secs(1),
            policy: FootingPolicy::default(),
            profiles: default_profiles(),
            sections: SectionKind::ALL.to_vec(),
        }
    }
}

impl ConsensusConfig {
    // ==================== Builder Methods ====================

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_agent_count(mut self, count: usize) -> Self {
        self.agent_count = count;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_policy(mut self, policy: FootingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_profiles(mut self, profiles: Vec<AgentProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_sections(mut self, sections: Vec<SectionKind>) -> Self {
        self.sections = sections;
        self
    }

    /// One profile per agent slot.
    pub fn agent_profiles(&self) -> Vec<AgentProfile> {
        profiles_for(self.agent_count, &self.profiles)
    }

    // ==================== Validation ====================

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.agent_count < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TooFewAgents,
                format!(
                    "agent_count is {}; consensus needs at least 2 agents",
                    self.agent_count
                ),
            ));
        }
        if self.max_retries > LARGE_RETRY_BUDGET {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::LargeRetryBudget,
                format!(
                    "max_retries is {}; each retry invokes all {} agents again",
                    self.max_retries, self.agent_count
                ),
            ));
        }
        if self.tolerance.value() > Decimal::new(1, 2) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::LooseTolerance,
                format!("consensus tolerance {} is above 1%", self.tolerance),
            ));
        }
        if self.policy.footing_tolerance.is_sign_negative()
            || self.policy.balance_tolerance.is_sign_negative()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidFootingTolerance,
                "footing and balance tolerances must not be negative",
            ));
        }
        if self.sections.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownSection,
                "no statement sections configured",
            ));
        }

        issues
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
