// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadflow status`: lead and job queue counts.

use leadflow_core::LeadflowError;
use leadflow_storage::queries::{jobs, leads};
use leadflow_storage::SqliteStorage;

pub(crate) async fn run_status(storage: &SqliteStorage) -> Result<(), LeadflowError> {
    let db = storage.database()?;
    let counts = jobs::count_by_status(db).await?;
    let all_leads = leads::list_leads(db, None).await?;
    let responded = all_leads.iter().filter(|l| l.responded).count();

    println!(
        "{}",
        serde_json::json!({
            "leads": all_leads.len(),
            "responded": responded,
            "jobs": {
                "pending": counts.pending,
                "sent": counts.sent,
                "failed": counts.failed,
                "canceled": counts.canceled,
            }
        })
    );
    Ok(())
}
