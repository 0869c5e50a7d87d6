//! Configuration for a character creation session.

use std::path::PathBuf;

use crate::error::RulesResult;
use crate::reference::RuleBook;

/// Configuration for a creation session.
#[derive(Debug, Clone)]
pub struct CreatorConfig {
    /// RNG seed for reproducible gold rolls.
    pub seed: u64,
    /// Rulebook JSON to load instead of the standard one.
    pub rules: Option<PathBuf>,
}

impl Default for CreatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rules: None,
        }
    }
}

impl CreatorConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load reference tables from a JSON file.
    pub fn with_rules(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules = Some(path.into());
        self
    }

    /// Load the configured rulebook, or the standard one if none is set.
    pub fn load_rulebook(&self) -> RulesResult<RuleBook> {
        match &self.rules {
            Some(path) => RuleBook::from_path(path),
            None => Ok(RuleBook::standard()),
        }
    }
}
