// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Leadflow follow-up engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! Everything time- or routing-sensitive (schedule offsets, batch limit,
//! attempts budget, test recipient) lives here and is passed into the engine
//! explicitly; nothing is read from the environment at call time.

use serde::{Deserialize, Serialize};

/// Top-level Leadflow configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadflowConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Follow-up schedule offsets.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Dispatcher batching, retry, and recipient-routing settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Sequence generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// SMS transport settings.
    #[serde(default)]
    pub sms: SmsConfig,

    /// Email transport settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "leadflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Follow-up schedule configuration.
///
/// Each entry is a delay in minutes from lead creation; entry `k` (1-based)
/// becomes the `offset_k` follow-up job. Offsets are injected into the
/// scheduling policy, never hard-coded, so tests can use arbitrary small
/// values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Minutes after lead creation at which each follow-up runs.
    #[serde(default = "default_offset_minutes")]
    pub offset_minutes: Vec<i64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            offset_minutes: default_offset_minutes(),
        }
    }
}

fn default_offset_minutes() -> Vec<i64> {
    vec![24 * 60, 72 * 60] // +24h, +72h
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Maximum number of due jobs processed per dispatch invocation.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,

    /// Delivery attempts budget per job. A job stays `pending` after a
    /// transport failure until this many attempts have been made, then goes
    /// terminal `failed`. The default of 1 makes the first failure terminal.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Which transport delivers follow-ups: "sms" or "email".
    #[serde(default = "default_transport")]
    pub transport: String,

    /// When set, every outbound message is rerouted to this recipient
    /// instead of the lead's contact. For staging/test environments.
    #[serde(default)]
    pub test_recipient: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_limit: default_batch_limit(),
            max_attempts: default_max_attempts(),
            transport: default_transport(),
            test_recipient: None,
        }
    }
}

fn default_batch_limit() -> usize {
    25
}

fn default_max_attempts() -> u32 {
    1
}

fn default_transport() -> String {
    "sms".to_string()
}

/// Sequence generator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Maximum length (characters) of any generated message body; longer
    /// drafts are clamped at intake.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
        }
    }
}

fn default_max_message_length() -> usize {
    320 // two SMS segments
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for drafting message sequences.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per draft.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// SMS transport configuration (Twilio-compatible Messages API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmsConfig {
    /// Account SID for API authentication.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Auth token for API authentication.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// E.164 sender number.
    #[serde(default)]
    pub from_number: Option<String>,

    /// API base URL.
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base: default_sms_api_base(),
        }
    }
}

fn default_sms_api_base() -> String {
    "https://api.twilio.com".to_string()
}

/// Email transport configuration (SMTP submission).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// SMTP relay hostname.
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP submission port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,

    /// From address for outbound mail.
    #[serde(default)]
    pub from_address: Option<String>,

    /// Subject line applied to follow-up emails.
    #[serde(default = "default_email_subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from_address: None,
            subject: default_email_subject(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_email_subject() -> String {
    "Following up on your request".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "leadflow.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}
