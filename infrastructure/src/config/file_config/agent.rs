//! Agent profile overrides from TOML (`[[agents]]` tables)

use footing_domain::{AgentProfile, default_profiles};
use serde::{Deserialize, Serialize};

/// One agent profile override
///
/// # Example
///
/// ```toml
/// [[agents]]
/// id = "agent_2"
/// temperature = 0.1
///
/// [[agents]]
/// id = "agent_4"
/// approach = "Recompute every subtotal from the notes."
/// ```
///
/// An override whose id matches a stock profile replaces only the fields it
/// sets. Other ids add a profile based on `agent_1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAgentProfile {
    pub id: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub approach: Option<String>,
}

impl FileAgentProfile {
    fn apply(&self, mut profile: AgentProfile) -> AgentProfile {
        profile.id = self.id.clone();
        if let Some(temperature) = self.temperature {
            profile.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            profile.max_tokens = max_tokens;
        }
        if let Some(approach) = &self.approach {
            profile.approach = approach.clone();
        }
        profile
    }
}

/// Stock profiles with `overrides` applied, in slot order.
pub fn resolve_profiles(overrides: &[FileAgentProfile]) -> Vec<AgentProfile> {
    let mut profiles = default_profiles();
    for entry in overrides {
        match profiles.iter_mut().find(|profile| profile.id == entry.id) {
            Some(profile) => *profile = entry.apply(profile.clone()),
            None => {
                let base = profiles[0].clone();
                profiles.push(entry.apply(base));
            }
        }
    }
    profiles
}
