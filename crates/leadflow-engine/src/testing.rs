// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-crate test support: a scripted transport, a canned generator, and
//! database seeding helpers shared by the engine's unit tests.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadflow_core::types::{
    AdapterType, FollowupMessage, HealthStatus, Lead, MessageSequence, NewJob,
};
use leadflow_core::{LeadflowError, PluginAdapter, SequenceGenerator, TransportAdapter};
use leadflow_storage::queries::{jobs, leads};
use leadflow_storage::Database;

pub(crate) async fn setup_db() -> (Database, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
    (db, dir)
}

/// Seed a lead created at 2026-01-01T00:00:00Z with follow-ups "a" at +60s
/// and "b" at +120s, ids `<lead_id>-offset_1` / `<lead_id>-offset_2`.
pub(crate) async fn seed_lead_with_jobs(db: &Database, lead_id: &str, phone: &str) {
    let lead = Lead {
        id: lead_id.to_string(),
        name: "John".to_string(),
        service: "Roofing estimate".to_string(),
        interest: "Leak repair".to_string(),
        contact_phone: phone.to_string(),
        contact_email: Some("john@example.com".to_string()),
        message_sequence: MessageSequence {
            immediate: "hi".to_string(),
            followups: vec![
                FollowupMessage {
                    offset_key: "offset_1".to_string(),
                    body: "a".to_string(),
                },
                FollowupMessage {
                    offset_key: "offset_2".to_string(),
                    body: "b".to_string(),
                },
            ],
        },
        responded: false,
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
    };
    leads::create_lead(db, &lead).await.unwrap();
    jobs::enqueue_batch(
        db,
        &[
            NewJob {
                id: format!("{lead_id}-offset_1"),
                lead_id: lead_id.to_string(),
                offset_key: "offset_1".to_string(),
                run_at: "2026-01-01T00:01:00.000Z".to_string(),
                recipient: phone.to_string(),
                body: "a".to_string(),
            },
            NewJob {
                id: format!("{lead_id}-offset_2"),
                lead_id: lead_id.to_string(),
                offset_key: "offset_2".to_string(),
                run_at: "2026-01-01T00:02:00.000Z".to_string(),
                recipient: phone.to_string(),
                body: "b".to_string(),
            },
        ],
    )
    .await
    .unwrap();
}

/// A transport that records sends and fails on request.
pub(crate) struct MockTransport {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failing_bodies: Arc<Mutex<HashSet<String>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing_bodies: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Make sends of these exact bodies fail with a transport error.
    pub(crate) async fn fail_bodies(&self, bodies: &[&str]) {
        let mut failing = self.failing_bodies.lock().await;
        for body in bodies {
            failing.insert(body.to_string());
        }
    }

    pub(crate) async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
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
        if self.failing_bodies.lock().await.contains(body) {
            return Err(LeadflowError::Transport {
                message: format!("scripted failure sending `{body}`"),
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), body.to_string()));
        Ok(())
    }
}

/// A generator returning one canned sequence, or always failing.
pub(crate) struct MockGenerator {
    sequence: Option<MessageSequence>,
}

impl MockGenerator {
    pub(crate) fn with_sequence(sequence: MessageSequence) -> Self {
        Self {
            sequence: Some(sequence),
        }
    }

    pub(crate) fn failing() -> Self {
        Self { sequence: None }
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
        match &self.sequence {
            Some(seq) => Ok(seq.clone()),
            None => Err(LeadflowError::Provider {
                message: "scripted generation failure".to_string(),
                source: None,
            }),
        }
    }
}
