// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound notification email.
//!
//! `EmailSender` is the seam to the transactional email provider.
//! `ResendClient` speaks the Resend HTTP API:
//!
//! ```text
//! POST {api_base}/emails
//! Authorization: Bearer {api_key}
//! {"from": ..., "to": [...], "subject": ..., "text": ..., "reply_to": ...}
//! ```
//!
//! A 2xx answer carries `{"id": ...}`; anything else is a provider error
//! with a `{"message": ...}` body.

use crate::config::{with_trailing_slash, ContactConfig, DeliveryConfig};
use crate::models::ValidatedSubmission;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Delivery errors.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Provider unreachable: {0}")]
    Transport(String),

    #[error("Unreadable provider response: {0}")]
    MalformedResponse(String),
}

impl DeliveryError {
    /// Whether the provider itself refused or failed to send. Anything else
    /// is an unexpected fault of the collaborator.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Transport(_))
    }
}

/// Message handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Provider acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
}

/// Transactional email provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Build the owner notification for a validated submission.
pub fn compose_notification(submission: &ValidatedSubmission, contact: &ContactConfig) -> EmailMessage {
    let text = format!(
        "You have received a new contact form submission:\n\
         \n\
         Name: {name}\n\
         Email: {email}\n\
         \n\
         Message:\n\
         {message}\n\
         \n\
         ---\n\
         Sent from your portfolio contact form",
        name = submission.name(),
        email = submission.email(),
        message = submission.message(),
    );

    EmailMessage {
        from: contact.from_address.clone(),
        to: vec![contact.to_address.clone()],
        subject: format!("New Contact Form Submission from {}", submission.name()),
        text,
        reply_to: Some(submission.email().to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
}

/// Resend API client.
pub struct ResendClient {
    endpoint: Url,
    api_key: String,
    client: reqwest::Client,
}

impl ResendClient {
    /// Create a client from the delivery configuration.
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let endpoint = with_trailing_slash(config.api_base.clone())
            .join("emails")
            .map_err(|e| DeliveryError::Transport(format!("invalid API base: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        debug!(endpoint = %self.endpoint, to = ?message.to, "Posting email to provider");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str::<DeliveryReceipt>(&body)
                .map_err(|e| DeliveryError::MalformedResponse(e.to_string()))
        } else {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionRequest;
    use crate::validator::ContactValidator;

    fn contact() -> ContactConfig {
        ContactConfig {
            to_address: "owner@example.com".to_string(),
            from_address: "Contact Form <noreply@example.com>".to_string(),
        }
    }

    #[test]
    fn test_compose_notification() {
        let submission = ContactValidator::default()
            .validate(SubmissionRequest::new(
                "Ada Lovelace",
                "ada@example.com",
                "Would love to chat about engines.",
            ))
            .unwrap();

        let email = compose_notification(&submission, &contact());

        assert_eq!(email.from, "Contact Form <noreply@example.com>");
        assert_eq!(email.to, vec!["owner@example.com"]);
        assert_eq!(email.subject, "New Contact Form Submission from Ada Lovelace");
        assert_eq!(email.reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(
            email.text,
            "You have received a new contact form submission:\n\
             \n\
             Name: Ada Lovelace\n\
             Email: ada@example.com\n\
             \n\
             Message:\n\
             Would love to chat about engines.\n\
             \n\
             ---\n\
             Sent from your portfolio contact form"
        );
    }

    #[test]
    fn test_message_serializes_without_empty_reply_to() {
        let email = EmailMessage {
            from: "a@example.com".to_string(),
            to: vec!["b@example.com".to_string()],
            subject: "s".to_string(),
            text: "t".to_string(),
            reply_to: None,
        };
        let value = serde_json::to_value(&email).unwrap();
        assert!(value.get("reply_to").is_none());
        assert_eq!(value["to"], serde_json::json!(["b@example.com"]));
    }

    #[test]
    fn test_endpoint_joined_to_base() {
        let config = DeliveryConfig {
            api_key: "k".to_string(),
            api_base: Url::parse("http://127.0.0.1:9000/v1/").unwrap(),
            timeout_secs: 1,
        };
        let client = ResendClient::new(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9000/v1/emails");

        let config = DeliveryConfig {
            api_base: Url::parse("http://127.0.0.1:9000/v1").unwrap(),
            ..config
        };
        let client = ResendClient::new(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9000/v1/emails");
    }

    #[test]
    fn test_error_classification() {
        assert!(DeliveryError::Transport("refused".into()).is_delivery_failure());
        assert!(DeliveryError::Rejected {
            status: 422,
            message: "bad from".into()
        }
        .is_delivery_failure());
        assert!(!DeliveryError::MalformedResponse("eof".into()).is_delivery_failure());
    }
}
