#![forbid(unsafe_code)]

//! Error types.
//!
//! [`EffectsError::MissingTarget`] is the only error a controller produces at
//! runtime. The engine treats it as "skip this controller" and never hands it
//! to the host.

use std::fmt;

/// Errors produced while configuring or attaching effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectsError {
    /// A required page hook (element id or class) is absent.
    MissingTarget {
        /// The hook name that was looked up.
        hook: &'static str,
    },
    /// The typing animator was given no phrases.
    EmptyPhrases,
    /// Configuration failed to parse or validate.
    InvalidConfig(String),
}

impl fmt::Display for EffectsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget { hook } => write!(f, "missing target: {hook}"),
            Self::EmptyPhrases => write!(f, "phrase list is empty"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for EffectsError {}

impl From<serde_json::Error> for EffectsError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

/// Errors from the persisted preference store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot be reached (e.g. storage disabled by the browser).
    Unavailable(String),
    /// The backend refused the write (quota, privacy mode).
    Rejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Rejected(msg) => write!(f, "storage rejected write: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
