// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadflow follow-up engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Leadflow workspace. All adapter plugins
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeadflowError;
pub use types::{AdapterType, HealthStatus, JobId, JobStatus, LeadId};

// Re-export all adapter traits at crate root.
pub use traits::{PluginAdapter, SequenceGenerator, StorageAdapter, TransportAdapter};
