// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Leadflow engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Unique identifier for a follow-up job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Transport,
    Generator,
    Storage,
}

/// Lifecycle state of a follow-up job.
///
/// `Pending` is the sole initial state. `Sent`, `Canceled`, and a `Failed`
/// job whose attempts budget is exhausted are terminal; no transition ever
/// reopens them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Sent,
    Failed,
    Canceled,
}

/// One delayed entry of a generated message sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupMessage {
    /// Nominal offset label (`offset_1`, `offset_2`, …).
    pub offset_key: String,
    /// Message body for this offset.
    pub body: String,
}

/// An ordered outbound message sequence drafted for a lead.
///
/// The `immediate` entry is dispatched synchronously at intake; each
/// follow-up entry becomes exactly one scheduled job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSequence {
    pub immediate: String,
    pub followups: Vec<FollowupMessage>,
}

/// Input for creating a lead (the inbound lead event).
///
/// `contact_email` is absent for leads synthesized from missed calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub service: String,
    pub interest: String,
    pub contact_phone: String,
    pub contact_email: Option<String>,
}

/// A persisted lead record.
///
/// `responded` is the only mutable field and is monotonic false -> true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub service: String,
    pub interest: String,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub message_sequence: MessageSequence,
    pub responded: bool,
    pub created_at: String,
}

/// A persisted follow-up job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowupJob {
    pub id: String,
    pub lead_id: String,
    pub offset_key: String,
    pub run_at: String,
    pub recipient: String,
    pub body: String,
    pub status: JobStatus,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for enqueueing one follow-up job. Status and attempts are fixed
/// by the queue (`pending`, 0) at insert time.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: String,
    pub lead_id: String,
    pub offset_key: String,
    pub run_at: String,
    pub recipient: String,
    pub body: String,
}

/// Job counts by status for observability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub pending: u64,
    pub sent: u64,
    pub failed: u64,
    pub canceled: u64,
}

/// Timestamp format used for every persisted instant.
///
/// Matches SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')`, so stored
/// timestamps compare lexicographically in chronological order.
pub const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format an instant into the canonical persisted representation.
pub fn format_ts(t: DateTime<Utc>) -> String {
    t.format(TS_FORMAT).to_string()
}
