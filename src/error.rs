// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the admission pipeline.
//!
//! Only [`GateError`] is fatal. Lookup and re-broadcast failures are
//! handled per event and never abort processing on their own.

use thiserror::Error;

/// Systemic failures. Any of these halts processing.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Unable to parse {field} timestamp {value:?}: {source}")]
    Timestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unable to load muted identities: {0}")]
    Muted(#[source] LookupError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Re-broadcast failed: {0}")]
    Rebroadcast(#[from] RebroadcastError),

    #[error("Event task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration syntax: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache capacity for {0} must be greater than zero")]
    ZeroCapacity(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures from an external lookup collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Lookup unavailable: {0}")]
    Unavailable(String),

    #[error("Lookup rate limited")]
    RateLimited,
}

/// Failures from the re-broadcast action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RebroadcastError {
    /// The item was already re-broadcast.
    #[error("Item was already re-broadcast")]
    Duplicate,

    /// The item disappeared before it could be re-broadcast.
    #[error("Item no longer exists")]
    NotFound,

    #[error("Re-broadcast API error: {0}")]
    Api(String),
}

impl RebroadcastError {
    /// Duplicate and not-found answers are transient remote states, not failures.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Duplicate | Self::NotFound)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GateError>;
