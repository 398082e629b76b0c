// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Leadflow configuration system.

use leadflow_config::diagnostic::{suggest_key, ConfigError};
use leadflow_config::model::LeadflowConfig;
use leadflow_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_leadflow_config() {
    let toml = r#"
[agent]
name = "test-agent"
log_level = "debug"

[schedule]
offset_minutes = [1, 2]

[dispatch]
batch_limit = 10
max_attempts = 3
transport = "email"
test_recipient = "+15550000000"

[generator]
max_message_length = 160

[anthropic]
api_key = "sk-ant-123"
default_model = "claude-sonnet-4-20250514"

[sms]
account_sid = "AC123"
auth_token = "tok"
from_number = "+15551112222"

[email]
smtp_host = "smtp.example.com"
smtp_port = 465
username = "mailer"
password = "secret"
from_address = "followups@example.com"

[storage]
database_path = "/tmp/test.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.schedule.offset_minutes, vec![1, 2]);
    assert_eq!(config.dispatch.batch_limit, 10);
    assert_eq!(config.dispatch.max_attempts, 3);
    assert_eq!(config.dispatch.transport, "email");
    assert_eq!(
        config.dispatch.test_recipient.as_deref(),
        Some("+15550000000")
    );
    assert_eq!(config.generator.max_message_length, 160);
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-123"));
    assert_eq!(config.sms.account_sid.as_deref(), Some("AC123"));
    assert_eq!(config.email.smtp_port, 465);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "leadflow");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.schedule.offset_minutes, vec![1440, 4320]);
    assert_eq!(config.dispatch.batch_limit, 25);
    assert_eq!(config.dispatch.max_attempts, 1);
    assert_eq!(config.dispatch.transport, "sms");
    assert!(config.dispatch.test_recipient.is_none());
    assert_eq!(config.generator.max_message_length, 320);
    assert!(config.anthropic.api_key.is_none());
    assert_eq!(config.storage.database_path, "leadflow.db");
    assert!(config.storage.wal_mode);
}

/// Unknown field in [dispatch] section produces an UnknownField error.
#[test]
fn unknown_field_in_dispatch_produces_error() {
    let toml = r#"
[dispatch]
batch_limti = 10
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("batch_limti"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err =
        load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Environment-style dotted overrides take precedence over TOML values.
#[test]
fn dotted_override_beats_toml_value() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[dispatch]
transport = "sms"
"#;

    let config: LeadflowConfig = Figment::new()
        .merge(Serialized::defaults(LeadflowConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("dispatch.transport", "email"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.dispatch.transport, "email");
}

/// Dotted key with an underscore maps as one key, not nested tables.
#[test]
fn underscore_key_override_maps_to_single_key() {
    use figment::{providers::Serialized, Figment};

    let config: LeadflowConfig = Figment::new()
        .merge(Serialized::defaults(LeadflowConfig::default()))
        .merge(("sms.auth_token", "tok-from-env"))
        .extract()
        .expect("should set auth_token via dot notation");

    assert_eq!(config.sms.auth_token.as_deref(), Some("tok-from-env"));
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: LeadflowConfig = Figment::new()
        .merge(Serialized::defaults(LeadflowConfig::default()))
        .merge(Toml::file("/nonexistent/path/leadflow.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.agent.name, "leadflow");
}

// ============================================================================
// Diagnostic tests
// ============================================================================

/// Unknown key "trasport" in [dispatch] suggests "transport".
#[test]
fn diagnostic_error_includes_unknown_key_and_suggestion() {
    let toml = r#"
[dispatch]
trasport = "sms"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty(), "should have at least one error");

    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys } if {
            key == "trasport"
                && suggestion.as_deref() == Some("transport")
                && valid_keys.contains("batch_limit")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'trasport' with suggestion 'transport', got: {errors:?}"
    );
}

/// Unknown key with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["batch_limit", "max_attempts", "transport"];
    assert!(suggest_key("zzzzzz", valid_keys).is_none());
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[dispatch]
batch_limit = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("batch_limit"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic (can be rendered).
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "trasport".to_string(),
        suggestion: Some("transport".to_string()),
        valid_keys: "batch_limit, max_attempts, transport, test_recipient".to_string(),
    };

    let code = error.code();
    assert!(code.is_some(), "should have diagnostic code");

    let help = error.help();
    assert!(help.is_some(), "should have help text");
    let help_str = help.unwrap().to_string();
    assert!(
        help_str.contains("did you mean `transport`"),
        "help should contain suggestion, got: {help_str}"
    );
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[agent]
name = "test"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.agent.name, "test");
}

/// Validation catches semantic errors after successful deserialization.
#[test]
fn validation_catches_bad_offsets() {
    let toml = r#"
[schedule]
offset_minutes = [120, 60]
"#;

    let errors = load_and_validate_str(toml).expect_err("decreasing offsets should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("offset_minutes"))
    });
    assert!(
        has_validation_error,
        "should have validation error for decreasing offsets"
    );
}

/// Validation catches an unknown transport name.
#[test]
fn validation_catches_unknown_transport() {
    let toml = r#"
[dispatch]
transport = "fax"
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown transport should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("fax"))
    });
    assert!(has_validation_error, "should flag unknown transport");
}
