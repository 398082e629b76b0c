// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./leadflow.toml` > `~/.config/leadflow/leadflow.toml`
//! > `/etc/leadflow/leadflow.toml` with environment variable overrides via
//! `LEADFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LeadflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leadflow/leadflow.toml` (system-wide)
/// 3. `~/.config/leadflow/leadflow.toml` (user XDG config)
/// 4. `./leadflow.toml` (local directory)
/// 5. `LEADFLOW_*` environment variables
pub fn load_config() -> Result<LeadflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadflowConfig::default()))
        .merge(Toml::file("/etc/leadflow/leadflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("leadflow/leadflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("leadflow.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LeadflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeadflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LEADFLOW_SMS_AUTH_TOKEN` must map to
/// `sms.auth_token`, not `sms.auth.token`.
fn env_provider() -> Env {
    Env::prefixed("LEADFLOW_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: LEADFLOW_SMS_AUTH_TOKEN -> "sms_auth_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("schedule_", "schedule.", 1)
            .replacen("dispatch_", "dispatch.", 1)
            .replacen("generator_", "generator.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("sms_", "sms.", 1)
            .replacen("email_", "email.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
