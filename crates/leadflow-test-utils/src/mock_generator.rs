// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock sequence generator for deterministic testing.
//!
//! `MockGenerator` implements `SequenceGenerator` with pre-configured
//! sequences, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadflow_core::types::{AdapterType, FollowupMessage, HealthStatus, MessageSequence};
use leadflow_core::{LeadflowError, PluginAdapter, SequenceGenerator};

/// A mock generator that returns pre-configured sequences.
///
/// Sequences are popped from a FIFO queue. When the queue is empty, a
/// default two-step sequence is returned. `fail_next` injects one
/// generation failure, exercising intake's fallback path.
pub struct MockGenerator {
    sequences: Arc<Mutex<VecDeque<MessageSequence>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl MockGenerator {
    /// Create a new mock generator with an empty sequence queue.
    pub fn new() -> Self {
        Self {
            sequences: Arc::new(Mutex::new(VecDeque::new())),
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a mock generator pre-loaded with the given sequences.
    pub fn with_sequences(sequences: Vec<MessageSequence>) -> Self {
        Self {
            sequences: Arc::new(Mutex::new(VecDeque::from(sequences))),
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    /// Add a sequence to the end of the queue.
    pub async fn add_sequence(&self, sequence: MessageSequence) {
        self.sequences.lock().await.push_back(sequence);
    }

    /// Make the next `generate` call fail with a provider error.
    pub async fn fail_next(&self) {
        *self.fail_next.lock().await = true;
    }

    /// The default sequence returned when the queue is empty.
    pub fn default_sequence() -> MessageSequence {
        MessageSequence {
            immediate: "Thanks for reaching out! We'll be in touch shortly.".to_string(),
            followups: vec![
                FollowupMessage {
                    offset_key: "offset_1".to_string(),
                    body: "Just checking in -- happy to answer any questions.".to_string(),
                },
                FollowupMessage {
                    offset_key: "offset_2".to_string(),
                    body: "We're still here whenever you're ready.".to_string(),
                },
            ],
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl SequenceGenerator for MockGenerator {
    async fn generate(
        &self,
        _name: &str,
        _service: &str,
        _interest: &str,
    ) -> Result<MessageSequence, LeadflowError> {
        let mut fail = self.fail_next.lock().await;
        if *fail {
            *fail = false;
            return Err(LeadflowError::Provider {
                message: "scripted generation failure".to_string(),
                source: None,
            });
        }
        Ok(self
            .sequences
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(Self::default_sequence))
    }
}
