//! Configuration issues.
//!
//! Configuration validation reports structured issues instead of failing on
//! the first problem, so every problem can be shown at once. Issues with
//! [`Severity::Error`] abort startup; warnings are printed and ignored.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Consensus tolerance is negative or not a number.
    InvalidTolerance,
    /// Fewer than two agents cannot reach consensus.
    TooFewAgents,
    /// Provider name is not one of the supported providers.
    UnknownProvider,
    /// Provider needs an API key and none is configured.
    MissingApiKey,
    /// Batch concurrency of zero.
    InvalidConcurrency,
    /// Footing or balance tolerance is negative.
    InvalidFootingTolerance,
    /// A very large retry budget multiplies model cost.
    LargeRetryBudget,
    /// Tolerance above 1% defeats strict consensus.
    LooseTolerance,
    /// Unknown section name in the configured section list.
    UnknownSection,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let issue = ConfigIssue::error(ConfigIssueCode::TooFewAgents, "agent_count must be >= 2");
        assert!(issue.is_error());
        assert_eq!(issue.to_string(), "error: agent_count must be >= 2");

        let issue = ConfigIssue::warning(ConfigIssueCode::LargeRetryBudget, "max_retries is 10");
        assert!(!issue.is_error());
    }
}
