// SPDX-FileCopyrightText: 2026 Panoplia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Panoplia mission tracker.
//!
//! These errors travel between adapters and the failure-tolerant facades.
//! Domain services never let them unwind past a single operation; rejected
//! transitions and full slots are modelled as typed outcomes instead.

use thiserror::Error;

/// The primary error type used by storage adapters, configuration and wiring.
#[derive(Debug, Error)]
pub enum PanopliaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database unavailable, quota exceeded, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A persisted value could not be encoded or decoded.
    #[error("serialization error for key `{key}`: {source}")]
    Serialization {
        key: String,
        source: serde_json::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PanopliaError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PanopliaError::Storage {
            source: Box::new(err),
        }
    }
}
