//! Error types.
//!
//! [`LoadError`] is fatal to one load attempt and is never retried inside the
//! crate. [`ConfigError`] covers the operations layered on top of a loaded
//! source: template writing, key lookup and the strict typed reads.
//!
//! Typed getters on [`ServerConfig`](crate::ServerConfig) never produce an
//! error; a value that does not parse reads as the type's zero value.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum LoadError {
    #[error("Unrecognized config file format for {path} (expected .ini or .json)")]
    UnknownFormat { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed INI in {path} (line {line}): {reason}")]
    IniSyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Malformed JSON in {path}: {source}")]
    JsonSyntax {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Top level of {path} must be an object")]
    NotAnObject { path: PathBuf },

    #[error("Nested more than one level in {path}, at '{key}'")]
    NestedTooDeep { path: PathBuf, key: String },

    #[error("Only objects may be nested in {path}, at '{key}'")]
    NestedNotObject { path: PathBuf, key: String },

    #[error("Override scope key '{key}' in {path} is not a server id")]
    InvalidServerId { path: PathBuf, key: String },

    #[error("Number for '{key}' in {path} is not an integer")]
    NonIntegerNumber { path: PathBuf, key: String },
}

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LoadError {
    /// The offending key for the structural JSON variants.
    pub fn key(&self) -> Option<&str> {
        match self {
            LoadError::NestedTooDeep { key, .. }
            | LoadError::NestedNotObject { key, .. }
            | LoadError::InvalidServerId { key, .. }
            | LoadError::NonIntegerNumber { key, .. } => Some(key),
            _ => None,
        }
    }
}
