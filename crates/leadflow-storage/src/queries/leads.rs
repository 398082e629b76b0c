// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead store operations.

use leadflow_core::{LeadId, LeadflowError};
use rusqlite::params;

use crate::database::Database;
use crate::models::Lead;

/// Map a lead row in SELECT column order.
fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead, rusqlite::Error> {
    let seq_json: String = row.get(6)?;
    let message_sequence = serde_json::from_str(&seq_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        service: row.get(2)?,
        interest: row.get(3)?,
        contact_phone: row.get(4)?,
        contact_email: row.get(5)?,
        message_sequence,
        responded: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const LEAD_COLUMNS: &str = "id, name, service, interest, contact_phone, contact_email,
                            message_sequence, responded, created_at";

/// Persist a new lead. The caller validates contact fields first, so a
/// failure here leaves no partial state.
pub async fn create_lead(db: &Database, lead: &Lead) -> Result<(), LeadflowError> {
    let lead = lead.clone();
    let seq_json = serde_json::to_string(&lead.message_sequence)
        .map_err(|e| LeadflowError::Internal(format!("failed to encode message sequence: {e}")))?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO leads (id, name, service, interest, contact_phone, contact_email,
                                    message_sequence, responded, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
                params![
                    lead.id,
                    lead.name,
                    lead.service,
                    lead.interest,
                    lead.contact_phone,
                    lead.contact_email,
                    seq_json,
                    lead.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a lead by ID.
pub async fn get_lead(db: &Database, id: &str) -> Result<Option<Lead>, LeadflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], lead_from_row);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List leads, optionally filtered by responded flag, newest first.
pub async fn list_leads(
    db: &Database,
    responded: Option<bool>,
) -> Result<Vec<Lead>, LeadflowError> {
    db.connection()
        .call(move |conn| {
            let mut leads = Vec::new();
            match responded {
                Some(flag) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {LEAD_COLUMNS} FROM leads
                         WHERE responded = ?1 ORDER BY created_at DESC"
                    ))?;
                    let rows = stmt.query_map(params![flag], lead_from_row)?;
                    for row in rows {
                        leads.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC"
                    ))?;
                    let rows = stmt.query_map([], lead_from_row)?;
                    for row in rows {
                        leads.push(row?);
                    }
                }
            }
            Ok(leads)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip `responded` to true for every not-yet-responded lead matching the
/// phone. Returns the ids newly flagged (empty if none matched or all had
/// already responded). Does NOT touch jobs -- that composition belongs to
/// the response tracker.
pub async fn mark_responded(db: &Database, phone: &str) -> Result<Vec<LeadId>, LeadflowError> {
    let phone = phone.to_string();
    let ids = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let ids: Vec<String> = {
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
            for id in &ids {
                tx.execute(
                    "UPDATE leads SET responded = 1 WHERE id = ?1 AND responded = 0",
                    params![id],
                )?;
            }
            tx.commit()?;
            Ok(ids)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(ids.into_iter().map(LeadId).collect())
}
