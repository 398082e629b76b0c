// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as strictly increasing schedule offsets and a known
//! transport name.

use crate::diagnostic::ConfigError;
use crate::model::LeadflowConfig;

/// Transport names the dispatcher can resolve.
pub const KNOWN_TRANSPORTS: &[&str] = &["sms", "email"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeadflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Schedule offsets: at least one, positive, strictly increasing.
    // Strict ordering guarantees no two jobs per lead share a nominal offset.
    if config.schedule.offset_minutes.is_empty() {
        errors.push(ConfigError::Validation {
            message: "schedule.offset_minutes must contain at least one offset".to_string(),
        });
    }
    for window in config.schedule.offset_minutes.windows(2) {
        if window[1] <= window[0] {
            errors.push(ConfigError::Validation {
                message: format!(
                    "schedule.offset_minutes must be strictly increasing, got {} after {}",
                    window[1], window[0]
                ),
            });
        }
    }
    if let Some(&first) = config.schedule.offset_minutes.first()
        && first <= 0
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.offset_minutes entries must be positive, got {first}"
            ),
        });
    }

    // Dispatch settings.
    if config.dispatch.batch_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.batch_limit must be at least 1".to_string(),
        });
    }
    if config.dispatch.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.max_attempts must be at least 1".to_string(),
        });
    }
    if !KNOWN_TRANSPORTS.contains(&config.dispatch.transport.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.transport `{}` is not one of: {}",
                config.dispatch.transport,
                KNOWN_TRANSPORTS.join(", ")
            ),
        });
    }
    if let Some(recipient) = &config.dispatch.test_recipient
        && recipient.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "dispatch.test_recipient must not be empty when set".to_string(),
        });
    }

    // Generator settings.
    if config.generator.max_message_length == 0 {
        errors.push(ConfigError::Validation {
            message: "generator.max_message_length must be at least 1".to_string(),
        });
    }

    // Storage settings.
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
