// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Leadflow integration tests.
//!
//! Provides mock adapters (`MockTransport`, `MockGenerator`) and a
//! `TestHarness` assembling the full pipeline over a temp SQLite database.

pub mod harness;
pub mod mock_generator;
pub mod mock_transport;

pub use harness::{sample_lead, TestHarness, TestHarnessBuilder};
pub use mock_generator::MockGenerator;
pub use mock_transport::{MockTransport, SentMessage};
