// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Follow-up job queue operations.
//!
//! Every transition out of `pending` is a single conditional UPDATE guarded
//! by `status = 'pending'`, serialized through the single background writer.
//! Overlapping dispatcher and response-tracker invocations therefore resolve
//! each job exactly one way; a losing update is a no-op, never a double
//! effect.

use leadflow_core::types::JobStatus;
use leadflow_core::LeadflowError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{FollowupJob, NewJob, QueueCounts};

const JOB_COLUMNS: &str = "id, lead_id, offset_key, run_at, recipient, body,
                           status, attempts, last_error, created_at, updated_at";

/// Map a job row in SELECT column order.
fn job_from_row(row: &rusqlite::Row<'_>) -> Result<FollowupJob, rusqlite::Error> {
    let status_str: String = row.get(6)?;
    let status = status_str.parse::<JobStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(FollowupJob {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        offset_key: row.get(2)?,
        run_at: row.get(3)?,
        recipient: row.get(4)?,
        body: row.get(5)?,
        status,
        attempts: row.get(7)?,
        last_error: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Enqueue a batch of jobs for one lead, all-or-nothing.
///
/// Runs inside a single transaction so the "one job per configured offset"
/// invariant holds even under a mid-batch failure: either every job is
/// persisted as `pending` or none are. A duplicate (lead, offset) pair
/// violates the schema's UNIQUE constraint and rolls back the whole batch.
pub async fn enqueue_batch(db: &Database, jobs: &[NewJob]) -> Result<(), LeadflowError> {
    let jobs = jobs.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for job in &jobs {
                tx.execute(
                    "INSERT INTO followup_jobs
                         (id, lead_id, offset_key, run_at, recipient, body,
                          status, attempts, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', 0,
                             strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                             strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                    params![
                        job.id,
                        job.lead_id,
                        job.offset_key,
                        job.run_at,
                        job.recipient,
                        job.body,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Select up to `limit` due jobs, earliest first.
///
/// A job is due when it is `pending`, its `run_at` is at or before `now`,
/// and its owning lead has not responded. The responded check happens here,
/// at selection time, so a response recorded before this query suppresses
/// the job even if it was enqueued long ago. `now` is an explicit parameter;
/// the queue never reads the clock.
pub async fn select_due(
    db: &Database,
    now: &str,
    limit: i64,
) -> Result<Vec<FollowupJob>, LeadflowError> {
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT j.id, j.lead_id, j.offset_key, j.run_at, j.recipient, j.body,
                        j.status, j.attempts, j.last_error, j.created_at, j.updated_at
                 FROM followup_jobs j
                 JOIN leads ON leads.id = j.lead_id
                 WHERE j.status = 'pending'
                   AND j.run_at <= ?1
                   AND leads.responded = 0
                 ORDER BY j.run_at ASC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![now, limit], job_from_row)?;
            let mut jobs = Vec::new();
            for row in rows {
                jobs.push(row?);
            }
            Ok(jobs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition a job `pending` -> `sent`.
///
/// Returns false (and changes nothing) when the job already left `pending`
/// -- e.g. canceled between selection and this update, or marked by an
/// overlapping dispatcher pass. Idempotent by construction.
pub async fn mark_sent(db: &Database, id: &str) -> Result<bool, LeadflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE followup_jobs
                 SET status = 'sent',
                     attempts = attempts + 1,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'pending'",
                params![id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record a delivery failure on a `pending` job.
///
/// Increments `attempts` and stores the diagnostic. The job goes terminal
/// `failed` once the attempts budget is exhausted; below the budget it stays
/// `pending` and is retried on a later dispatch pass. One statement, guarded
/// by `status = 'pending'`, so it composes safely with cancellation.
/// Returns false (no-op) when the job already left `pending`.
pub async fn mark_failed(
    db: &Database,
    id: &str,
    error: &str,
    max_attempts: u32,
) -> Result<bool, LeadflowError> {
    let id = id.to_string();
    let error = error.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE followup_jobs
                 SET attempts = attempts + 1,
                     last_error = ?2,
                     status = CASE WHEN attempts + 1 >= ?3 THEN 'failed' ELSE 'pending' END,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'pending'",
                params![id, error, max_attempts],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition every `pending` job of a lead to `canceled`.
///
/// Returns the number of jobs transitioned. Jobs already `sent`, `failed`,
/// or `canceled` are untouched: a send that won the race stays sent.
pub async fn cancel_pending(db: &Database, lead_id: &str) -> Result<u64, LeadflowError> {
    let lead_id = lead_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE followup_jobs
                 SET status = 'canceled',
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE lead_id = ?1 AND status = 'pending'",
                params![lead_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a job by ID.
pub async fn get_job(db: &Database, id: &str) -> Result<Option<FollowupJob>, LeadflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOB_COLUMNS} FROM followup_jobs WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], job_from_row);
            match result {
                Ok(job) => Ok(Some(job)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all jobs of a lead ordered by run time.
pub async fn list_jobs_for_lead(
    db: &Database,
    lead_id: &str,
) -> Result<Vec<FollowupJob>, LeadflowError> {
    let lead_id = lead_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOB_COLUMNS} FROM followup_jobs
                 WHERE lead_id = ?1 ORDER BY run_at ASC"
            ))?;
            let rows = stmt.query_map(params![lead_id], job_from_row)?;
            let mut jobs = Vec::new();
            for row in rows {
                jobs.push(row?);
            }
            Ok(jobs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Job counts by status for observability.
pub async fn count_by_status(db: &Database) -> Result<QueueCounts, LeadflowError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM followup_jobs GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
            })?;
            let mut counts = QueueCounts::default();
            for row in rows {
                let (status, count) = row?;
                match status.as_str() {
                    "pending" => counts.pending = count,
                    "sent" => counts.sent = count,
                    "failed" => counts.failed = count,
                    "canceled" => counts.canceled = count,
                    _ => {}
                }
            }
            Ok(counts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
