// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response recording: flip `responded` and cancel pending jobs atomically.

use leadflow_core::LeadflowError;
use rusqlite::params;

use crate::database::Database;

/// Outcome of recording an inbound response at the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseRecord {
    /// Leads newly flagged as responded.
    pub lead_ids: Vec<String>,
    /// Pending jobs transitioned to canceled across those leads.
    pub jobs_canceled: u64,
}

/// Record an inbound response from `phone` in one transaction.
///
/// Composes the lead store's mark-responded with the queue's cancel-pending:
/// every not-yet-responded lead matching the phone is flagged, and each
/// newly-flagged lead's still-pending jobs are canceled. Because both
/// updates are status-guarded and committed together on the single writer,
/// a job concurrently claimed by a dispatcher pass either was already marked
/// (cancel skips it -- the message was in flight) or is canceled here and
/// the dispatcher's later mark becomes a no-op. Never both.
pub async fn record_response(db: &Database, phone: &str) -> Result<ResponseRecord, LeadflowError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let lead_ids: Vec<String> = {
                let mut stmt = tx.prepare(
                    "SELECT id FROM leads WHERE contact_phone = ?1 AND responded = 0",
                )?;
                let rows = stmt.query_map(params![phone], |row| row.get(0))?;
                let mut ids = Vec::new();
                for row in rows {
                    ids.push(row?);
                }
                ids
            };

            let mut jobs_canceled: u64 = 0;
            for lead_id in &lead_ids {
                tx.execute(
                    "UPDATE leads SET responded = 1 WHERE id = ?1 AND responded = 0",
                    params![lead_id],
                )?;
                let changed = tx.execute(
                    "UPDATE followup_jobs
                     SET status = 'canceled',
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE lead_id = ?1 AND status = 'pending'",
                    params![lead_id],
                )?;
                jobs_canceled += changed as u64;
            }

            tx.commit()?;
            Ok(ResponseRecord {
                lead_ids,
                jobs_canceled,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
