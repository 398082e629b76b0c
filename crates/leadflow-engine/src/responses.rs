// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response tracker: an inbound reply suppresses further scheduled sends.

use serde::Serialize;
use tracing::{debug, info};

use leadflow_core::LeadflowError;
use leadflow_storage::queries::responses;
use leadflow_storage::Database;

/// Counts returned when recording an inbound response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseOutcome {
    pub leads_updated: usize,
    pub jobs_canceled: u64,
}

/// Record an inbound reply from `phone`.
///
/// Flips `responded` on every matching not-yet-responded lead and cancels
/// their still-pending jobs, both inside one storage transaction. `responded`
/// is monotonic: replays and repeat replies report zero updates.
///
/// Racing a dispatch pass is best-effort by design: a job the dispatcher
/// already marked keeps its `sent`/`failed` outcome (the message was in
/// flight), and a job canceled here turns the dispatcher's later mark into a
/// no-op. `raw_body` is not interpreted -- reply parsing is an enrichment
/// concern outside the tracker.
pub async fn record_response(
    db: &Database,
    phone: &str,
    raw_body: &str,
) -> Result<ResponseOutcome, LeadflowError> {
    debug!(phone, body_len = raw_body.len(), "inbound response received");

    let record = responses::record_response(db, phone).await?;
    let outcome = ResponseOutcome {
        leads_updated: record.lead_ids.len(),
        jobs_canceled: record.jobs_canceled,
    };

    info!(
        phone,
        leads_updated = outcome.leads_updated,
        jobs_canceled = outcome.jobs_canceled,
        "response recorded"
    );
    Ok(outcome)
}
