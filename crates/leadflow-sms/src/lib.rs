// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS transport adapter for the Leadflow follow-up engine.
//!
//! Delivers message bodies through a Twilio-compatible Messages API:
//! form-encoded POST with basic auth against
//! `/2010-04-01/Accounts/{sid}/Messages.json`. Every delivery failure --
//! HTTP transport, non-2xx status, timeout -- maps to
//! [`LeadflowError::Transport`] so the dispatcher records it on the job and
//! keeps going.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use leadflow_config::model::SmsConfig;
use leadflow_core::types::{AdapterType, HealthStatus};
use leadflow_core::{LeadflowError, PluginAdapter, TransportAdapter};

/// Error payload returned by the Messages API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Twilio-style SMS transport.
#[derive(Debug)]
pub struct SmsTransport {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_base: String,
}

impl SmsTransport {
    /// Build a transport from configuration.
    ///
    /// Fails with [`LeadflowError::Config`] when credentials or the sender
    /// number are missing.
    pub fn from_config(config: &SmsConfig) -> Result<Self, LeadflowError> {
        let account_sid = config
            .account_sid
            .clone()
            .ok_or_else(|| LeadflowError::Config("sms.account_sid is not set".to_string()))?;
        let auth_token = config
            .auth_token
            .clone()
            .ok_or_else(|| LeadflowError::Config("sms.auth_token is not set".to_string()))?;
        let from_number = config
            .from_number
            .clone()
            .ok_or_else(|| LeadflowError::Config("sms.from_number is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LeadflowError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            account_sid,
            auth_token,
            from_number,
            api_base: config.api_base.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl PluginAdapter for SmsTransport {
    fn name(&self) -> &str {
        "sms"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl TransportAdapter for SmsTransport {
    async fn send(&self, recipient: &str, body: &str) -> Result<(), LeadflowError> {
        let form = serde_urlencoded::to_string([
            ("To", recipient),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ])
        .map_err(|e| LeadflowError::Transport {
            message: format!("failed to encode SMS payload: {e}"),
            source: Some(Box::new(e)),
        })?;

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| LeadflowError::Transport {
                message: format!("SMS request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(recipient, "SMS accepted by API");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(api_err) => format!(
                "SMS API returned {status} (code {}): {}",
                api_err.code.unwrap_or_default(),
                api_err.message.unwrap_or_default()
            ),
            Err(_) => format!("SMS API returned {status}: {text}"),
        };
        Err(LeadflowError::Transport {
            message,
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_base: &str) -> SmsConfig {
        SmsConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("secret".to_string()),
            from_number: Some("+15551112222".to_string()),
            api_base: api_base.to_string(),
        }
    }

    #[test]
    fn from_config_requires_credentials() {
        let mut config = make_config("https://api.twilio.com");
        config.auth_token = None;
        let err = SmsTransport::from_config(&config).unwrap_err();
        assert!(matches!(err, LeadflowError::Config(_)));

        let mut config = make_config("https://api.twilio.com");
        config.from_number = None;
        assert!(SmsTransport::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn send_posts_form_encoded_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(header_exists("authorization"))
            .and(body_string_contains("To=%2B15551234567"))
            .and(body_string_contains("From=%2B15551112222"))
            .and(body_string_contains("Body=hello+there"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sid": "SM123", "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = SmsTransport::from_config(&make_config(&server.uri())).unwrap();
        transport.send("+15551234567", "hello there").await.unwrap();
    }

    #[tokio::test]
    async fn api_error_maps_to_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "code": 21211, "message": "Invalid 'To' phone number"
            })))
            .mount(&server)
            .await;

        let transport = SmsTransport::from_config(&make_config(&server.uri())).unwrap();
        let err = transport.send("+1", "hi").await.unwrap_err();
        match err {
            LeadflowError::Transport { message, .. } => {
                assert!(message.contains("21211"), "got: {message}");
                assert!(message.contains("Invalid 'To'"), "got: {message}");
            }
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_api_maps_to_transport_error() {
        // Nothing is listening on this port.
        let config = make_config("http://127.0.0.1:9");
        let transport = SmsTransport::from_config(&config).unwrap();
        let err = transport.send("+15551234567", "hi").await.unwrap_err();
        assert!(matches!(err, LeadflowError::Transport { .. }));
    }
}
