// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequence generator trait for drafting outbound message sequences.

use async_trait::async_trait;

use crate::error::LeadflowError;
use crate::traits::adapter::PluginAdapter;
use crate::types::MessageSequence;

/// Adapter for message-sequence generation (LLM providers).
///
/// Implementations draft an immediate reply plus delayed follow-ups from the
/// lead's attributes. A failure here must never prevent scheduling: intake
/// substitutes a fixed fallback sequence when `generate` errors.
#[async_trait]
pub trait SequenceGenerator: PluginAdapter {
    /// Drafts a message sequence for the given lead attributes.
    ///
    /// All returned bodies are non-empty; the caller clamps them to the
    /// configured maximum message length.
    async fn generate(
        &self,
        name: &str,
        service: &str,
        interest: &str,
    ) -> Result<MessageSequence, LeadflowError>;
}
