// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadflow follow-up engine.

use thiserror::Error;

/// The primary error type used across all Leadflow adapter traits and core operations.
#[derive(Debug, Error)]
pub enum LeadflowError {
    /// Input shape errors (contact format, empty required field). Always
    /// raised before any persistence, so a validation failure has no side
    /// effects.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable store errors (database connection, query failure, serialization).
    /// Fatal to the current operation; callers must not assume partial state.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Message transport errors (network, auth, rate limiting, timeout).
    /// Recorded per-job via `mark_failed`, never propagated out of a batch.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Sequence generator errors (API failure, malformed draft, token limits).
    /// Absorbed at intake by the fallback sequence.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Requested adapter was not found in the registry.
    #[error("adapter not found: {adapter_type}/{name}")]
    AdapterNotFound { adapter_type: String, name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
