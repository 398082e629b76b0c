// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadflow dispatch`: one poll-driven batch of due sends.

use chrono::Utc;

use leadflow_config::LeadflowConfig;
use leadflow_core::LeadflowError;
use leadflow_engine::run_batch;
use leadflow_storage::SqliteStorage;

use crate::resolve_transport;

pub(crate) async fn run_dispatch(
    storage: &SqliteStorage,
    config: &LeadflowConfig,
) -> Result<(), LeadflowError> {
    let transport = resolve_transport(config)?;
    let outcome = run_batch(
        storage.database()?,
        transport.as_ref(),
        &config.dispatch,
        Utc::now(),
    )
    .await?;

    println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
    Ok(())
}
