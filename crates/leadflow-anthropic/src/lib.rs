// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude sequence generator for the Leadflow follow-up engine.
//!
//! Prompts the Messages API for a strict-JSON message sequence and parses it
//! into a [`MessageSequence`]. Any API or parse failure surfaces as
//! [`LeadflowError::Provider`]; intake substitutes the fallback sequence, so
//! a bad draft never blocks scheduling.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

use leadflow_config::model::AnthropicConfig;
use leadflow_core::types::{AdapterType, FollowupMessage, HealthStatus, MessageSequence};
use leadflow_core::{LeadflowError, PluginAdapter, SequenceGenerator};

pub use client::AnthropicClient;
use types::{ApiMessage, MessageRequest};

/// System prompt for drafting.
const DRAFT_SYSTEM_PROMPT: &str =
    "You write short, professional follow-up messages for small businesses.";

/// Sequence generator backed by the Anthropic Messages API.
#[derive(Debug)]
pub struct AnthropicGenerator {
    client: AnthropicClient,
    followup_count: usize,
    max_tokens: u32,
}

impl AnthropicGenerator {
    /// Create a generator producing `followup_count` delayed messages per lead.
    pub fn new(client: AnthropicClient, followup_count: usize, max_tokens: u32) -> Self {
        Self {
            client,
            followup_count,
            max_tokens,
        }
    }

    /// Build a generator from configuration.
    ///
    /// Fails with [`LeadflowError::Config`] when no API key is configured.
    pub fn from_config(
        config: &AnthropicConfig,
        followup_count: usize,
    ) -> Result<Self, LeadflowError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LeadflowError::Config("anthropic.api_key is not set".to_string()))?;
        let client = AnthropicClient::new(
            api_key,
            config.api_version.clone(),
            config.default_model.clone(),
        )?;
        Ok(Self::new(client, followup_count, config.max_tokens))
    }

    fn draft_prompt(&self, name: &str, service: &str, interest: &str) -> String {
        let offset_keys: Vec<String> = (1..=self.followup_count)
            .map(|k| format!("\"offset_{k}\""))
            .collect();
        format!(
            "Name: {name}\nService: {service}\nInterest: {interest}\n\n\
             Write a 2-sentence text message reply to send right now, plus {count} \
             short follow-up text messages to send on later days if they don't answer.\n\
             Respond with ONLY a JSON object with the keys \"immediate\", {keys}, \
             each mapping to one message string.",
            count = self.followup_count,
            keys = offset_keys.join(", "),
        )
    }
}

/// Parse the model's draft into a sequence.
///
/// Accepts the bare JSON object or one wrapped in a Markdown code fence.
/// Every key must be present with a non-empty string value.
fn parse_sequence(text: &str, followup_count: usize) -> Result<MessageSequence, LeadflowError> {
    let trimmed = text.trim();
    let json_str = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| LeadflowError::Provider {
            message: format!("draft is not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;

    let field = |key: &str| -> Result<String, LeadflowError> {
        match value.get(key).and_then(|v| v.as_str()) {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(LeadflowError::Provider {
                message: format!("draft is missing key `{key}`"),
                source: None,
            }),
        }
    };

    let immediate = field("immediate")?;
    let mut followups = Vec::with_capacity(followup_count);
    for k in 1..=followup_count {
        let offset_key = format!("offset_{k}");
        followups.push(FollowupMessage {
            body: field(&offset_key)?,
            offset_key,
        });
    }

    Ok(MessageSequence {
        immediate,
        followups,
    })
}

#[async_trait]
impl PluginAdapter for AnthropicGenerator {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl SequenceGenerator for AnthropicGenerator {
    async fn generate(
        &self,
        name: &str,
        service: &str,
        interest: &str,
    ) -> Result<MessageSequence, LeadflowError> {
        let request = MessageRequest {
            model: self.client.default_model().to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: self.draft_prompt(name, service, interest),
            }],
            system: Some(DRAFT_SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self.client.complete_message(&request).await?;
        let sequence = parse_sequence(&response.text(), self.followup_count)?;
        debug!(
            followups = sequence.followups.len(),
            "message sequence drafted"
        );
        Ok(sequence)
    }
}
