// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadflow ingest` and `leadflow missed-call`: lead creation events.

use chrono::Utc;

use leadflow_anthropic::AnthropicGenerator;
use leadflow_config::LeadflowConfig;
use leadflow_core::types::NewLead;
use leadflow_core::LeadflowError;
use leadflow_engine::{create_lead, lead_from_missed_call};
use leadflow_storage::SqliteStorage;

use crate::resolve_transport;

#[allow(clippy::too_many_arguments)]
pub(crate) async fn run_ingest(
    storage: &SqliteStorage,
    config: &LeadflowConfig,
    name: String,
    service: String,
    interest: String,
    phone: String,
    email: Option<String>,
) -> Result<(), LeadflowError> {
    let generator =
        AnthropicGenerator::from_config(&config.anthropic, config.schedule.offset_minutes.len())?;
    let transport = resolve_transport(config)?;

    let input = NewLead {
        name,
        service,
        interest,
        contact_phone: phone,
        contact_email: email,
    };
    let outcome = create_lead(
        storage.database()?,
        &generator,
        transport.as_ref(),
        config,
        &input,
        Utc::now(),
    )
    .await?;

    println!(
        "{}",
        serde_json::json!({
            "lead_id": outcome.lead.id,
            "jobs_enqueued": outcome.jobs_enqueued,
            "immediate_sent": outcome.immediate_sent,
            "immediate_error": outcome.immediate_error,
        })
    );
    Ok(())
}

pub(crate) async fn run_missed_call(
    storage: &SqliteStorage,
    config: &LeadflowConfig,
    phone: String,
) -> Result<(), LeadflowError> {
    let generator =
        AnthropicGenerator::from_config(&config.anthropic, config.schedule.offset_minutes.len())?;
    let transport = resolve_transport(config)?;

    let outcome = lead_from_missed_call(
        storage.database()?,
        &generator,
        transport.as_ref(),
        config,
        &phone,
        Utc::now(),
    )
    .await?;

    println!(
        "{}",
        serde_json::json!({
            "lead_id": outcome.lead.id,
            "jobs_enqueued": outcome.jobs_enqueued,
            "immediate_sent": outcome.immediate_sent,
        })
    );
    Ok(())
}
