// synthesis configuration, loadable from TOON
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// What to do when a mapping re-enters a (source, target) pair that is
/// already being mapped further up the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CyclePolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Reference types assigned by value, on top of every value type.
    pub simple_types: BTreeSet<String>,
    pub cycle_policy: CyclePolicy,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            simple_types: ["String", "Decimal"].into_iter().map(String::from).collect(),
            cycle_policy: CyclePolicy::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn with_simple_type(mut self, name: impl Into<String>) -> Self {
        self.simple_types.insert(name.into());
        self
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn is_simple_name(&self, name: &str) -> bool {
        self.simple_types.contains(name)
    }

    pub fn from_toon(doc: &str) -> Result<Self, ConfigError> {
        toon_format::decode_default(doc).map_err(|e| ConfigError::Decode(e.to_string()))
    }

    pub fn to_toon(&self) -> Result<String, ConfigError> {
        toon_format::encode_default(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }
}
