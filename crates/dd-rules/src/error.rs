//! Error types for the rules engine.
//!
//! Rule checks themselves never fail: out-of-bounds choices are rejected
//! as no-ops (see [`crate::character::Applied`]). These errors cover the
//! fallible edges around them, such as loading a rulebook.

use std::path::PathBuf;

/// Errors that can occur while loading or validating reference data.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The rulebook file could not be read.
    #[error("failed to read rulebook '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The rulebook JSON could not be parsed.
    #[error("invalid rulebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The rulebook parsed but is not internally consistent.
    #[error("invalid rulebook: {0}")]
    InvalidRulebook(String),

    /// A step name could not be recognized.
    #[error("unknown step: {0}")]
    UnknownStep(String),

    /// A chain key string could not be parsed.
    #[error("invalid chain key: {0}")]
    InvalidChainKey(String),

    /// An ability code could not be recognized.
    #[error("unknown ability: {0}")]
    UnknownAbility(String),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
