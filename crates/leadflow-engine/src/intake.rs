// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead intake: validate, draft a sequence, persist the schedule, send the
//! immediate reply.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use leadflow_config::model::LeadflowConfig;
use leadflow_core::types::{format_ts, Lead, NewLead};
use leadflow_core::{validate, LeadflowError, SequenceGenerator, TransportAdapter};
use leadflow_storage::queries::{jobs, leads};
use leadflow_storage::Database;

use crate::schedule::{build_jobs, fallback_sequence, normalize_sequence};

/// Result of ingesting one lead event.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub lead: Lead,
    pub jobs_enqueued: usize,
    /// Whether the immediate message was delivered synchronously. A failure
    /// here does not fail intake -- the schedule is already persisted.
    pub immediate_sent: bool,
    pub immediate_error: Option<String>,
}

/// Ingest a lead event.
///
/// Steps, in order:
/// 1. validate contact fields -- a [`LeadflowError::Validation`] is returned
///    before anything is persisted;
/// 2. draft the message sequence via the generator, substituting the fixed
///    fallback sequence on any generation failure;
/// 3. persist the lead and its full batch of follow-up jobs (batch enqueue
///    is all-or-nothing);
/// 4. send the `immediate` entry synchronously through the transport. It is
///    never enqueued; its outcome is reported, not raised.
pub async fn create_lead(
    db: &Database,
    generator: &dyn SequenceGenerator,
    transport: &dyn TransportAdapter,
    config: &LeadflowConfig,
    input: &NewLead,
    now: DateTime<Utc>,
) -> Result<IntakeOutcome, LeadflowError> {
    validate::validate_phone(&input.contact_phone)?;
    if let Some(email) = &input.contact_email {
        validate::validate_email(email)?;
    }

    let offsets = &config.schedule.offset_minutes;
    let sequence = match generator
        .generate(&input.name, &input.service, &input.interest)
        .await
    {
        Ok(sequence) => sequence,
        Err(e) => {
            warn!(error = %e, "sequence generation failed, using fallback");
            fallback_sequence(&input.name, &input.service, offsets.len())
        }
    };
    let sequence = normalize_sequence(
        sequence,
        offsets,
        config.generator.max_message_length,
        &input.name,
        &input.service,
    );

    let lead = Lead {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name.clone(),
        service: input.service.clone(),
        interest: input.interest.clone(),
        contact_phone: input.contact_phone.clone(),
        contact_email: input.contact_email.clone(),
        message_sequence: sequence.clone(),
        responded: false,
        created_at: format_ts(now),
    };
    leads::create_lead(db, &lead).await?;

    let new_jobs = build_jobs(&lead.id, now, &input.contact_phone, &sequence, offsets);
    jobs::enqueue_batch(db, &new_jobs).await?;

    let recipient = config
        .dispatch
        .test_recipient
        .as_deref()
        .unwrap_or(&input.contact_phone);
    let (immediate_sent, immediate_error) =
        match transport.send(recipient, &sequence.immediate).await {
            Ok(()) => (true, None),
            Err(e) => {
                warn!(lead_id = %lead.id, error = %e, "immediate send failed");
                (false, Some(e.to_string()))
            }
        };

    info!(
        lead_id = %lead.id,
        jobs_enqueued = new_jobs.len(),
        immediate_sent,
        "lead created and follow-ups scheduled"
    );
    Ok(IntakeOutcome {
        lead,
        jobs_enqueued: new_jobs.len(),
        immediate_sent,
        immediate_error,
    })
}

/// Synthesize a lead from a missed-call event.
///
/// The caller's number is the only contact we have; attributes are
/// placeholders and the schedule is the same as for form leads.
pub async fn lead_from_missed_call(
    db: &Database,
    generator: &dyn SequenceGenerator,
    transport: &dyn TransportAdapter,
    config: &LeadflowConfig,
    phone: &str,
    now: DateTime<Utc>,
) -> Result<IntakeOutcome, LeadflowError> {
    let input = NewLead {
        name: "there".to_string(),
        service: "your recent call".to_string(),
        interest: "missed call".to_string(),
        contact_phone: phone.to_string(),
        contact_email: None,
    };
    create_lead(db, generator, transport, config, &input, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{setup_db, MockGenerator, MockTransport};
    use leadflow_core::types::{FollowupMessage, JobStatus, MessageSequence};
    use leadflow_storage::queries::jobs::list_jobs_for_lead;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn small_offsets_config() -> LeadflowConfig {
        let mut config = LeadflowConfig::default();
        config.schedule.offset_minutes = vec![1, 2];
        config
    }

    fn form_lead() -> NewLead {
        NewLead {
            name: "Sarah".to_string(),
            service: "Kitchen remodel".to_string(),
            interest: "Cabinet upgrade".to_string(),
            contact_phone: "+15551234567".to_string(),
            contact_email: Some("sarah@example.com".to_string()),
        }
    }

    fn generated_sequence() -> MessageSequence {
        MessageSequence {
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
        }
    }

    #[tokio::test]
    async fn intake_persists_lead_and_one_job_per_offset() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::with_sequence(generated_sequence());
        let transport = MockTransport::new();

        let outcome = create_lead(
            &db,
            &generator,
            &transport,
            &small_offsets_config(),
            &form_lead(),
            t0(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.jobs_enqueued, 2);
        assert!(outcome.immediate_sent);

        let stored = leads::get_lead(&db, &outcome.lead.id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, "2026-01-01T00:00:00.000Z");
        assert!(!stored.responded);

        // One job per configured offset with run_at = created_at + offset.
        let jobs = list_jobs_for_lead(&db, &outcome.lead.id).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].run_at, "2026-01-01T00:01:00.000Z");
        assert_eq!(jobs[0].body, "a");
        assert_eq!(jobs[1].run_at, "2026-01-01T00:02:00.000Z");
        assert_eq!(jobs[1].body, "b");
        assert!(jobs.iter().all(|j| j.status == JobStatus::Pending));

        // The immediate entry went through the transport, not the queue.
        let sends = transport.sent().await;
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0], ("+15551234567".to_string(), "hi".to_string()));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_contact_fields_reject_before_persistence() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::with_sequence(generated_sequence());
        let transport = MockTransport::new();
        let config = small_offsets_config();

        let mut bad_phone = form_lead();
        bad_phone.contact_phone = "5551234567".to_string();
        let err = create_lead(&db, &generator, &transport, &config, &bad_phone, t0())
            .await
            .unwrap_err();
        assert!(matches!(err, LeadflowError::Validation(_)));

        let mut bad_email = form_lead();
        bad_email.contact_email = Some("not-an-email".to_string());
        let err = create_lead(&db, &generator, &transport, &config, &bad_email, t0())
            .await
            .unwrap_err();
        assert!(matches!(err, LeadflowError::Validation(_)));

        // No side effects: no leads stored, nothing sent.
        assert!(leads::list_leads(&db, None).await.unwrap().is_empty());
        assert!(transport.sent().await.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn generation_failure_falls_back_and_still_schedules() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::failing();
        let transport = MockTransport::new();

        let outcome = create_lead(
            &db,
            &generator,
            &transport,
            &small_offsets_config(),
            &form_lead(),
            t0(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.jobs_enqueued, 2, "fallback still schedules fully");
        assert!(outcome.immediate_sent);

        let jobs = list_jobs_for_lead(&db, &outcome.lead.id).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| !j.body.is_empty()));
        assert!(jobs[0].body.contains("Sarah"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn immediate_send_failure_does_not_fail_intake() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::with_sequence(generated_sequence());
        let transport = MockTransport::new();
        transport.fail_bodies(&["hi"]).await;

        let outcome = create_lead(
            &db,
            &generator,
            &transport,
            &small_offsets_config(),
            &form_lead(),
            t0(),
        )
        .await
        .unwrap();

        assert!(!outcome.immediate_sent);
        assert!(outcome.immediate_error.is_some());
        // The schedule survived.
        let jobs = list_jobs_for_lead(&db, &outcome.lead.id).await.unwrap();
        assert_eq!(jobs.len(), 2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn oversized_bodies_are_clamped_at_intake() {
        let (db, _dir) = setup_db().await;
        let mut sequence = generated_sequence();
        sequence.followups[0].body = "x".repeat(2000);
        let generator = MockGenerator::with_sequence(sequence);
        let transport = MockTransport::new();

        let mut config = small_offsets_config();
        config.generator.max_message_length = 50;

        let outcome = create_lead(&db, &generator, &transport, &config, &form_lead(), t0())
            .await
            .unwrap();

        let jobs = list_jobs_for_lead(&db, &outcome.lead.id).await.unwrap();
        assert_eq!(jobs[0].body.chars().count(), 50);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_recipient_reroutes_immediate_send() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::with_sequence(generated_sequence());
        let transport = MockTransport::new();

        let mut config = small_offsets_config();
        config.dispatch.test_recipient = Some("+15550009999".to_string());

        create_lead(&db, &generator, &transport, &config, &form_lead(), t0())
            .await
            .unwrap();

        let sends = transport.sent().await;
        assert_eq!(sends[0].0, "+15550009999");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missed_call_synthesizes_phone_only_lead_with_schedule() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::failing();
        let transport = MockTransport::new();

        let outcome = lead_from_missed_call(
            &db,
            &generator,
            &transport,
            &small_offsets_config(),
            "+15557654321",
            t0(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.lead.contact_phone, "+15557654321");
        assert!(outcome.lead.contact_email.is_none());
        assert_eq!(outcome.jobs_enqueued, 2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missed_call_with_bad_number_is_rejected() {
        let (db, _dir) = setup_db().await;
        let generator = MockGenerator::failing();
        let transport = MockTransport::new();

        let err = lead_from_missed_call(
            &db,
            &generator,
            &transport,
            &small_offsets_config(),
            "not-a-number",
            t0(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LeadflowError::Validation(_)));

        db.close().await.unwrap();
    }
}
