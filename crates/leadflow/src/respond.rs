// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadflow respond`: record an inbound reply.

use leadflow_core::LeadflowError;
use leadflow_engine::record_response;
use leadflow_storage::SqliteStorage;

pub(crate) async fn run_respond(
    storage: &SqliteStorage,
    phone: &str,
    body: &str,
) -> Result<(), LeadflowError> {
    let outcome = record_response(storage.database()?, phone, body).await?;
    println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
    Ok(())
}
