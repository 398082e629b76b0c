// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Leadflow follow-up engine.
//!
//! Ties the lead store and job queue to the injected generator and transport
//! adapters:
//!
//! - **intake**: lead event -> validated lead + persisted schedule +
//!   immediate send
//! - **schedule**: pure policy computing job run-times from configured
//!   offsets
//! - **dispatcher**: one bounded, poll-driven batch of due sends
//! - **responses**: inbound reply -> responded flag + canceled jobs
//!
//! Every time-sensitive operation takes `now` as an explicit argument.

pub mod dispatcher;
pub mod intake;
pub mod responses;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{run_batch, BatchOutcome};
pub use intake::{create_lead, lead_from_missed_call, IntakeOutcome};
pub use responses::{record_response, ResponseOutcome};
pub use schedule::{build_jobs, fallback_sequence, normalize_sequence};
