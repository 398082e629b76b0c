// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling policy: pure functions from a lead-creation event and a
//! generated sequence to the batch of follow-up jobs.
//!
//! Deterministic given identical inputs: job ids are derived from the lead
//! id and the offset key, run times from `created_at` plus the configured
//! offset. Offsets are injected (minutes from lead creation), never
//! hard-coded, so tests can use arbitrarily small values.

use chrono::{DateTime, Duration, Utc};

use leadflow_core::types::{format_ts, FollowupMessage, MessageSequence, NewJob};

/// Compute the follow-up jobs for a lead.
///
/// Produces one job per follow-up entry, zipped with the configured offsets:
/// entry `k` runs at `created_at + offset_minutes[k]`. The `immediate` entry
/// is dispatched synchronously by the caller and is NOT enqueued. The
/// sequence must already be normalized against the offsets (see
/// [`normalize_sequence`]), giving the 1:1 offset/job correspondence by
/// construction.
pub fn build_jobs(
    lead_id: &str,
    created_at: DateTime<Utc>,
    recipient: &str,
    sequence: &MessageSequence,
    offset_minutes: &[i64],
) -> Vec<NewJob> {
    sequence
        .followups
        .iter()
        .zip(offset_minutes.iter())
        .map(|(message, &minutes)| NewJob {
            // Derived id: enqueueing the same lead twice hits the primary
            // key, keeping schedule creation exactly-once per lead.
            id: format!("{lead_id}-{}", message.offset_key),
            lead_id: lead_id.to_string(),
            offset_key: message.offset_key.clone(),
            run_at: format_ts(created_at + Duration::minutes(minutes)),
            recipient: recipient.to_string(),
            body: message.body.clone(),
        })
        .collect()
}

/// The fixed sequence used when generation fails.
///
/// Generation failure must never prevent scheduling, so these bodies are
/// compiled in and always non-empty.
pub fn fallback_sequence(name: &str, service: &str, followup_count: usize) -> MessageSequence {
    let followups = (1..=followup_count)
        .map(|k| FollowupMessage {
            offset_key: format!("offset_{k}"),
            body: match k {
                1 => format!(
                    "Hi {name}, just checking in about {service}. Happy to answer any questions."
                ),
                _ => format!(
                    "Hi {name}, we're still here if you'd like to move forward with {service}. \
                     Reply any time."
                ),
            },
        })
        .collect();
    MessageSequence {
        immediate: format!(
            "Hi {name}, thanks for reaching out about {service}! We'll follow up with details \
             shortly."
        ),
        followups,
    }
}

/// Normalize a generated sequence against the configured offsets.
///
/// Guarantees the invariants intake relies on: exactly one follow-up per
/// configured offset, canonical `offset_k` keys, non-empty bodies, and every
/// body clamped to `max_message_length` characters. Surplus follow-ups are
/// dropped; missing or empty entries are filled from the fallback sequence.
pub fn normalize_sequence(
    sequence: MessageSequence,
    offset_minutes: &[i64],
    max_message_length: usize,
    name: &str,
    service: &str,
) -> MessageSequence {
    let fallback = fallback_sequence(name, service, offset_minutes.len());

    let immediate = clamp_body(&sequence.immediate, max_message_length)
        .unwrap_or_else(|| clamp_lossy(&fallback.immediate, max_message_length));

    let followups = (0..offset_minutes.len())
        .map(|i| {
            let body = sequence
                .followups
                .get(i)
                .and_then(|m| clamp_body(&m.body, max_message_length))
                .unwrap_or_else(|| clamp_lossy(&fallback.followups[i].body, max_message_length));
            FollowupMessage {
                offset_key: format!("offset_{}", i + 1),
                body,
            }
        })
        .collect();

    MessageSequence {
        immediate,
        followups,
    }
}

/// Trim and clamp a body; None when it is effectively empty.
fn clamp_body(body: &str, max_len: usize) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(clamp_lossy(trimmed, max_len))
    }
}

fn clamp_lossy(body: &str, max_len: usize) -> String {
    body.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn two_step_sequence() -> MessageSequence {
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

    #[test]
    fn build_jobs_computes_run_at_from_offsets() {
        // Offsets of 1 and 2 minutes from a T0 lead.
        let jobs = build_jobs("lead-1", t0(), "+15551234567", &two_step_sequence(), &[1, 2]);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].run_at, "2026-01-01T00:01:00.000Z");
        assert_eq!(jobs[0].body, "a");
        assert_eq!(jobs[0].offset_key, "offset_1");
        assert_eq!(jobs[1].run_at, "2026-01-01T00:02:00.000Z");
        assert_eq!(jobs[1].body, "b");
        assert_eq!(jobs[1].offset_key, "offset_2");
        for job in &jobs {
            assert_eq!(job.lead_id, "lead-1");
            assert_eq!(job.recipient, "+15551234567");
        }
    }

    #[test]
    fn build_jobs_is_deterministic() {
        let a = build_jobs("lead-1", t0(), "+15551234567", &two_step_sequence(), &[1, 2]);
        let b = build_jobs("lead-1", t0(), "+15551234567", &two_step_sequence(), &[1, 2]);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.run_at, y.run_at);
            assert_eq!(x.body, y.body);
        }
    }

    #[test]
    fn build_jobs_never_enqueues_the_immediate_entry() {
        let jobs = build_jobs("lead-1", t0(), "+15551234567", &two_step_sequence(), &[1, 2]);
        assert!(jobs.iter().all(|j| j.body != "hi"));
    }

    #[test]
    fn fallback_sequence_is_non_empty_for_any_count() {
        for count in [1, 2, 5] {
            let seq = fallback_sequence("Sarah", "a kitchen remodel", count);
            assert!(!seq.immediate.is_empty());
            assert_eq!(seq.followups.len(), count);
            assert!(seq.followups.iter().all(|m| !m.body.is_empty()));
        }
    }

    #[test]
    fn normalize_truncates_surplus_followups() {
        let mut seq = two_step_sequence();
        seq.followups.push(FollowupMessage {
            offset_key: "offset_3".to_string(),
            body: "c".to_string(),
        });
        let normalized = normalize_sequence(seq, &[1, 2], 320, "Sarah", "remodel");
        assert_eq!(normalized.followups.len(), 2);
        assert_eq!(normalized.followups[1].body, "b");
    }

    #[test]
    fn normalize_fills_missing_followups_from_fallback() {
        let seq = MessageSequence {
            immediate: "hi".to_string(),
            followups: vec![FollowupMessage {
                offset_key: "offset_1".to_string(),
                body: "a".to_string(),
            }],
        };
        let normalized = normalize_sequence(seq, &[1, 2, 3], 320, "Sarah", "remodel");
        assert_eq!(normalized.followups.len(), 3);
        assert_eq!(normalized.followups[0].body, "a");
        assert!(normalized.followups[1].body.contains("Sarah"));
        assert!(normalized.followups[2].body.contains("Sarah"));
    }

    #[test]
    fn normalize_replaces_empty_bodies_and_clamps_length() {
        let seq = MessageSequence {
            immediate: "   ".to_string(),
            followups: vec![FollowupMessage {
                offset_key: "offset_1".to_string(),
                body: "x".repeat(1000),
            }],
        };
        let normalized = normalize_sequence(seq, &[1], 100, "Sarah", "remodel");
        assert!(!normalized.immediate.trim().is_empty(), "empty immediate replaced");
        assert_eq!(normalized.followups[0].body.chars().count(), 100);
    }

    #[test]
    fn normalize_canonicalizes_offset_keys() {
        let seq = MessageSequence {
            immediate: "hi".to_string(),
            followups: vec![FollowupMessage {
                offset_key: "day_one".to_string(),
                body: "a".to_string(),
            }],
        };
        let normalized = normalize_sequence(seq, &[1, 2], 320, "Sarah", "remodel");
        assert_eq!(normalized.followups[0].offset_key, "offset_1");
        assert_eq!(normalized.followups[1].offset_key, "offset_2");
    }
}
