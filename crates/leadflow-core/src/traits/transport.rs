// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport adapter trait for outbound message delivery (SMS, email).

use async_trait::async_trait;

use crate::error::LeadflowError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for outbound message transports.
///
/// Transports deliver a single message body to a single recipient. Calls
/// carry a bounded timeout inside the adapter; a timeout surfaces as an
/// ordinary [`LeadflowError::Transport`] failure.
#[async_trait]
pub trait TransportAdapter: PluginAdapter {
    /// Sends `body` to `recipient`.
    ///
    /// Any delivery failure (network, auth, rate limit, timeout) is returned
    /// as [`LeadflowError::Transport`]; the dispatcher records it on the job
    /// and continues the batch.
    async fn send(&self, recipient: &str, body: &str) -> Result<(), LeadflowError>;
}

impl std::fmt::Debug for dyn TransportAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportAdapter")
            .field("name", &self.name())
            .finish()
    }
}
