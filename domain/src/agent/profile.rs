//! Agent profiles: how each of the N agents in a round is configured.

use serde::{Deserialize, Serialize};

/// Sampling settings and verification emphasis of one agent slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Verification emphasis appended to the extraction prompt.
    pub approach: String,
}

impl AgentProfile {
    pub fn new(
        id: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        approach: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            temperature,
            max_tokens,
            approach: approach.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// The three stock profiles.
pub fn default_profiles() -> Vec<AgentProfile> {
    vec![
        AgentProfile::new(
            "agent_1",
            0.0,
            8000,
            "Focus on systematic line-by-line verification of all calculations.",
        ),
        AgentProfile::new(
            "agent_2",
            0.05,
            7000,
            "Emphasize cross-checking totals against component sums.",
        ),
        AgentProfile::new(
            "agent_3",
            0.0,
            8000,
            "Comprehensive validation including balance sheet equation verification.",
        ),
    ]
}

/// Profiles for `count` agent slots.
///
/// Slots beyond `base` reuse its profiles in order, renamed `agent_<k>`.
/// An empty `base` falls back to [`default_profiles`].
pub fn profiles_for(count: usize, base: &[AgentProfile]) -> Vec<AgentProfile> {
    let fallback;
    let base = if base.is_empty() {
        fallback = default_profiles();
        &fallback[..]
    } else {
        base
    };

    (0..count)
        .map(|slot| {
            let profile = base[slot % base.len()].clone();
            if slot < base.len() {
                profile
            } else {
                profile.with_id(format!("agent_{}", slot + 1))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles() {
        let profiles = default_profiles();
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[1].id, "agent_2");
        assert_eq!(profiles[1].max_tokens, 7000);
        assert!((profiles[1].temperature - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn test_profiles_cycle_with_fresh_ids() {
        let profiles = profiles_for(5, &default_profiles());
        let ids: Vec<_> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["agent_1", "agent_2", "agent_3", "agent_4", "agent_5"]);
        assert_eq!(profiles[3].approach, profiles[0].approach);
    }

    #[test]
    fn test_fewer_slots_than_profiles() {
        let profiles = profiles_for(2, &default_profiles());
        assert_eq!(profiles.len(), 2);
    }

    #[test]
    fn test_empty_base_uses_defaults() {
        assert_eq!(profiles_for(3, &[]), default_profiles());
    }
}
