// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete follow-up pipeline with mock
//! adapters and a temp SQLite database, and exposes `ingest()`,
//! `dispatch_at()`, and `respond()` to drive it with explicit clocks.

use chrono::{DateTime, Utc};

use leadflow_config::model::LeadflowConfig;
use leadflow_core::types::{MessageSequence, NewLead};
use leadflow_core::LeadflowError;
use leadflow_engine::{
    create_lead, lead_from_missed_call, record_response, run_batch, BatchOutcome, IntakeOutcome,
    ResponseOutcome,
};
use leadflow_storage::Database;

use crate::mock_generator::MockGenerator;
use crate::mock_transport::MockTransport;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    sequences: Vec<MessageSequence>,
    offset_minutes: Vec<i64>,
    batch_limit: usize,
    max_attempts: u32,
    test_recipient: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            sequences: Vec::new(),
            // Small offsets so tests can step through the timeline.
            offset_minutes: vec![1, 2],
            batch_limit: 25,
            max_attempts: 1,
            test_recipient: None,
        }
    }

    /// Set mock generator sequences.
    pub fn with_sequences(mut self, sequences: Vec<MessageSequence>) -> Self {
        self.sequences = sequences;
        self
    }

    /// Set the schedule offsets in minutes.
    pub fn with_offsets(mut self, offset_minutes: Vec<i64>) -> Self {
        self.offset_minutes = offset_minutes;
        self
    }

    /// Set the dispatch batch limit.
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    /// Set the per-job delivery attempts budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Reroute every send to a fixed test recipient.
    pub fn with_test_recipient(mut self, recipient: &str) -> Self {
        self.test_recipient = Some(recipient.to_string());
        self
    }

    /// Build the test harness, creating the temp database.
    pub async fn build(self) -> Result<TestHarness, LeadflowError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| LeadflowError::Storage {
            source: e.into(),
        })?;
        let db_path = temp_dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await?;

        let mut config = LeadflowConfig::default();
        config.schedule.offset_minutes = self.offset_minutes;
        config.dispatch.batch_limit = self.batch_limit;
        config.dispatch.max_attempts = self.max_attempts;
        config.dispatch.test_recipient = self.test_recipient;

        let generator = if self.sequences.is_empty() {
            MockGenerator::new()
        } else {
            MockGenerator::with_sequences(self.sequences)
        };

        Ok(TestHarness {
            generator,
            transport: MockTransport::new(),
            db,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The mock sequence generator.
    pub generator: MockGenerator,
    /// The mock transport; all sends are captured here.
    pub transport: MockTransport,
    /// Temp SQLite database (cleaned up on drop).
    pub db: Database,
    /// Leadflow configuration used by every operation.
    pub config: LeadflowConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Ingest a lead event at the given instant.
    pub async fn ingest(
        &self,
        input: &NewLead,
        now: DateTime<Utc>,
    ) -> Result<IntakeOutcome, LeadflowError> {
        create_lead(
            &self.db,
            &self.generator,
            &self.transport,
            &self.config,
            input,
            now,
        )
        .await
    }

    /// Synthesize a lead from a missed call at the given instant.
    pub async fn missed_call(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<IntakeOutcome, LeadflowError> {
        lead_from_missed_call(
            &self.db,
            &self.generator,
            &self.transport,
            &self.config,
            phone,
            now,
        )
        .await
    }

    /// Run one dispatch batch at the given instant.
    pub async fn dispatch_at(&self, now: DateTime<Utc>) -> Result<BatchOutcome, LeadflowError> {
        run_batch(&self.db, &self.transport, &self.config.dispatch, now).await
    }

    /// Record an inbound response.
    pub async fn respond(
        &self,
        phone: &str,
        raw_body: &str,
    ) -> Result<ResponseOutcome, LeadflowError> {
        record_response(&self.db, phone, raw_body).await
    }
}

/// A standard lead event used across tests.
pub fn sample_lead() -> NewLead {
    NewLead {
        name: "Sarah".to_string(),
        service: "Kitchen remodel".to_string(),
        interest: "Cabinet upgrade".to_string(),
        contact_phone: "+15551234567".to_string(),
        contact_email: Some("sarah@example.com".to_string()),
    }
}
