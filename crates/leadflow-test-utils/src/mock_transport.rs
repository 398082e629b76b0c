// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport adapter for deterministic testing.
//!
//! `MockTransport` implements `TransportAdapter` with captured sends and
//! scriptable failures for assertion in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadflow_core::types::{AdapterType, HealthStatus};
use leadflow_core::{LeadflowError, PluginAdapter, TransportAdapter};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub body: String,
}

/// A mock message transport for testing.
///
/// Captures every successful send for later assertion. Failure can be
/// scripted globally (`fail_all`) or per recipient (`fail_recipient`);
/// failed sends are not captured, mirroring a transport that never accepted
/// the message.
pub struct MockTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail_all: Arc<Mutex<bool>>,
    failing_recipients: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Create a new mock transport that accepts everything.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_all: Arc::new(Mutex::new(false)),
            failing_recipients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every send fail with a transport error.
    pub async fn fail_all(&self, fail: bool) {
        *self.fail_all.lock().await = fail;
    }

    /// Make sends to one recipient fail with a transport error.
    pub async fn fail_recipient(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .await
            .push(recipient.to_string());
    }

    /// Get all captured sends.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of captured sends.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all captured sends.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl TransportAdapter for MockTransport {
    async fn send(&self, recipient: &str, body: &str) -> Result<(), LeadflowError> {
        let fail = *self.fail_all.lock().await
            || self
                .failing_recipients
                .lock()
                .await
                .iter()
                .any(|r| r == recipient);
        if fail {
            return Err(LeadflowError::Transport {
                message: format!("scripted failure sending to {recipient}"),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage {
            recipient: recipient.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
