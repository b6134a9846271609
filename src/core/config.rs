//! Engine configuration with documented constants
//!
//! Knobs that shape how a ranking pass is executed, not what the bot
//! prefers. Preferences live in [`crate::ai::behavior::BehaviorSettings`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticianError};

/// Configuration for the ranking engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum number of (decision, path) pairs before ranking goes parallel
    ///
    /// Below this, rayon's scheduling overhead costs more than it saves.
    /// A typical unit has a few hundred candidate paths and a handful of
    /// decisions, so 256 pairs is roughly "more than one tiny unit".
    pub parallel_threshold: usize,

    /// Build a human-readable trace for every ranked candidate
    ///
    /// Off by default. Traces never change scores or the selection.
    pub trace: bool,

    /// Model enemies that have not moved yet as able to close on us
    ///
    /// When false, unmoved enemies are evaluated at their current hex,
    /// exactly like enemies that have already moved.
    pub unmoved_enemy_envelope: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 256,
            trace: false,
            unmoved_enemy_envelope: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same config with tracing switched on
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(TacticianError::InvalidConfig(
                "parallel_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
