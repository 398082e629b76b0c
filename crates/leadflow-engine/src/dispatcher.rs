// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll-driven dispatch of due follow-up jobs.
//!
//! There is no in-process scheduler: an external trigger (cron, systemd
//! timer) invokes [`run_batch`] on a cadence with an explicit `now`. The
//! design does not assume single-invocation exclusivity -- overlapping
//! batches resolve each job exactly once through the queue's conditional
//! updates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use leadflow_config::model::DispatchConfig;
use leadflow_core::types::format_ts;
use leadflow_core::{LeadflowError, TransportAdapter};
use leadflow_storage::queries::jobs;
use leadflow_storage::Database;

/// Counts returned by one dispatch batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Process one bounded batch of due jobs.
///
/// Selects up to `config.batch_limit` due jobs (earliest `run_at` first),
/// sends each through the transport, and records the outcome per job. A
/// transport failure is recorded via `mark_failed` and never aborts the
/// rest of the batch; only storage errors propagate.
pub async fn run_batch(
    db: &Database,
    transport: &dyn TransportAdapter,
    config: &DispatchConfig,
    now: DateTime<Utc>,
) -> Result<BatchOutcome, LeadflowError> {
    let now_ts = format_ts(now);
    let due = jobs::select_due(db, &now_ts, config.batch_limit as i64).await?;

    let mut outcome = BatchOutcome::default();
    for job in due {
        outcome.attempted += 1;

        // Test-recipient rerouting: explicit config, never an ambient env read.
        let recipient = config
            .test_recipient
            .as_deref()
            .unwrap_or(&job.recipient);

        match transport.send(recipient, &job.body).await {
            Ok(()) => {
                outcome.sent += 1;
                let marked = jobs::mark_sent(db, &job.id).await?;
                if marked {
                    debug!(job_id = %job.id, lead_id = %job.lead_id, "follow-up sent");
                } else {
                    // Lost the race against a cancellation after the message
                    // went out. Accepted best-effort outcome; the job keeps
                    // its canceled status.
                    debug!(job_id = %job.id, "sent but job already left pending");
                }
            }
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "follow-up delivery failed");
                outcome.failed += 1;
                jobs::mark_failed(db, &job.id, &e.to_string(), config.max_attempts).await?;
            }
        }
    }

    info!(
        attempted = outcome.attempted,
        sent = outcome.sent,
        failed = outcome.failed,
        "dispatch batch complete"
    );
    Ok(outcome)
}
