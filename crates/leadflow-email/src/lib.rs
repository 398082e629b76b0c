// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email transport adapter for the Leadflow follow-up engine.
//!
//! Delivers message bodies over SMTP submission (STARTTLS) via lettre's
//! async transport. A bad recipient address or relay failure maps to
//! [`LeadflowError::Transport`] and is recorded on the job like any other
//! delivery failure.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use leadflow_config::model::EmailConfig;
use leadflow_core::types::{AdapterType, HealthStatus};
use leadflow_core::{LeadflowError, PluginAdapter, TransportAdapter};

/// SMTP email transport.
#[derive(Debug)]
pub struct EmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    subject: String,
}

impl EmailTransport {
    /// Build a transport from configuration.
    ///
    /// Requires `smtp_host` and `from_address`; credentials are applied when
    /// both username and password are set.
    pub fn from_config(config: &EmailConfig) -> Result<Self, LeadflowError> {
        let host = config
            .smtp_host
            .clone()
            .ok_or_else(|| LeadflowError::Config("email.smtp_host is not set".to_string()))?;
        let from_address = config
            .from_address
            .clone()
            .ok_or_else(|| LeadflowError::Config("email.from_address is not set".to_string()))?;
        let from: Mailbox = from_address.parse().map_err(|e| {
            LeadflowError::Config(format!("email.from_address is not a valid address: {e}"))
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .map_err(|e| LeadflowError::Config(format!("invalid SMTP relay `{host}`: {e}")))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from,
            subject: config.subject.clone(),
        })
    }

    /// Build the outbound message for a recipient.
    fn build_message(&self, recipient: &str, body: &str) -> Result<Message, LeadflowError> {
        let to: Mailbox = recipient.parse().map_err(|e| LeadflowError::Transport {
            message: format!("invalid recipient address `{recipient}`: {e}"),
            source: None,
        })?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(self.subject.clone())
            .body(body.to_string())
            .map_err(|e| LeadflowError::Transport {
                message: format!("failed to build email: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait]
impl PluginAdapter for EmailTransport {
    fn name(&self) -> &str {
        "email"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        if self.mailer.test_connection().await.unwrap_or(false) {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("SMTP relay unreachable".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl TransportAdapter for EmailTransport {
    async fn send(&self, recipient: &str, body: &str) -> Result<(), LeadflowError> {
        let message = self.build_message(recipient, body)?;
        self.mailer
            .send(message)
            .await
            .map_err(|e| LeadflowError::Transport {
                message: format!("SMTP delivery failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(recipient, "email accepted by relay");
        Ok(())
    }
}
