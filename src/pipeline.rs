// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission pipeline.
//!
//! A submission moves through `Validating -> RateChecking -> Recording ->
//! Delivering` and always ends in a [`SubmissionResult`]. Each stage returns
//! a typed error; [`ContactService::submit`] converts them to a result in
//! one place and never fails itself.
//!
//! The submission is recorded against the quota before delivery starts.
//! Rejected attempts (invalid fields, over quota) are not recorded. There
//! are no retries.

use crate::config::ContactConfig;
use crate::delivery::{compose_notification, DeliveryError, EmailSender};
use crate::limiter::{LimiterError, SubmissionLimiter};
use crate::models::{FailureKind, SubmissionRequest, SubmissionResult};
use crate::validator::{ContactValidator, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const DELIVERY_FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Pipeline stage, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    RateChecking,
    Recording,
    Delivering,
}

#[derive(Debug, Error)]
enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rate limit exceeded for {identifier}")]
    RateLimited {
        identifier: String,
        max_submissions: u32,
        window: String,
    },

    #[error(transparent)]
    Delivery(DeliveryError),

    #[error("{stage:?}: {detail}")]
    Unexpected { stage: Stage, detail: String },
}

impl SubmissionError {
    fn limiter(stage: Stage, err: LimiterError) -> Self {
        Self::Unexpected {
            stage,
            detail: err.to_string(),
        }
    }
}

impl From<SubmissionError> for SubmissionResult {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(e) => SubmissionResult::Failed {
                kind: FailureKind::Validation,
                reason: e.first_message().to_string(),
            },
            SubmissionError::RateLimited {
                max_submissions,
                window,
                ..
            } => SubmissionResult::Failed {
                kind: FailureKind::RateLimited,
                reason: format!(
                    "Rate limit exceeded. Please try again later (max {max_submissions} submissions per {window})."
                ),
            },
            SubmissionError::Delivery(e) if e.is_delivery_failure() => SubmissionResult::Failed {
                kind: FailureKind::Delivery,
                reason: DELIVERY_FAILED_MESSAGE.to_string(),
            },
            SubmissionError::Delivery(_) | SubmissionError::Unexpected { .. } => {
                SubmissionResult::Failed {
                    kind: FailureKind::Unexpected,
                    reason: UNEXPECTED_MESSAGE.to_string(),
                }
            }
        }
    }
}

/// The contact submission service.
pub struct ContactService {
    validator: ContactValidator,
    limiter: Arc<dyn SubmissionLimiter>,
    sender: Arc<dyn EmailSender>,
    contact: ContactConfig,
}

impl ContactService {
    pub fn new(
        validator: ContactValidator,
        limiter: Arc<dyn SubmissionLimiter>,
        sender: Arc<dyn EmailSender>,
        contact: ContactConfig,
    ) -> Self {
        Self {
            validator,
            limiter,
            sender,
            contact,
        }
    }

    /// Handle one form submission.
    pub async fn submit(&self, request: SubmissionRequest) -> SubmissionResult {
        match self.run(request).await {
            Ok(id) => {
                info!(email_id = %id, "Contact email sent");
                SubmissionResult::Sent {
                    message: SENT_MESSAGE.to_string(),
                }
            }
            Err(err) => {
                match &err {
                    SubmissionError::Validation(e) => {
                        info!(reason = %e, "Submission rejected by validation")
                    }
                    SubmissionError::RateLimited { identifier, .. } => {
                        warn!(%identifier, "Submission rejected by rate limit")
                    }
                    SubmissionError::Delivery(e) => error!(error = %e, "Email provider error"),
                    SubmissionError::Unexpected { stage, detail } => {
                        error!(?stage, %detail, "Error handling contact submission")
                    }
                }
                err.into()
            }
        }
    }

    async fn run(&self, request: SubmissionRequest) -> Result<String, SubmissionError> {
        debug!(stage = ?Stage::Validating, "Submission stage");
        let submission = self.validator.validate(request)?;

        debug!(stage = ?Stage::RateChecking, "Submission stage");
        let identifier = submission.identifier();
        self.limiter
            .cleanup()
            .await
            .map_err(|e| SubmissionError::limiter(Stage::RateChecking, e))?;
        let exceeded = self
            .limiter
            .is_exceeded(&identifier)
            .await
            .map_err(|e| SubmissionError::limiter(Stage::RateChecking, e))?;
        if exceeded {
            let quota = self.limiter.config();
            return Err(SubmissionError::RateLimited {
                identifier,
                max_submissions: quota.max_submissions,
                window: quota.describe_window(),
            });
        }

        debug!(stage = ?Stage::Recording, "Submission stage");
        self.limiter
            .record(&identifier)
            .await
            .map_err(|e| SubmissionError::limiter(Stage::Recording, e))?;

        debug!(stage = ?Stage::Delivering, "Submission stage");
        let email = compose_notification(&submission, &self.contact);
        let receipt = self
            .sender
            .send(&email)
            .await
            .map_err(SubmissionError::Delivery)?;

        Ok(receipt.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitConfig;
    use crate::delivery::{DeliveryReceipt, EmailMessage};
    use async_trait::async_trait;

    struct AcceptAll;

    #[async_trait]
    impl EmailSender for AcceptAll {
        async fn send(&self, _message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
            Ok(DeliveryReceipt { id: "msg_1".into() })
        }
    }

    struct BrokenStore(RateLimitConfig);

    #[async_trait]
    impl SubmissionLimiter for BrokenStore {
        async fn is_exceeded(&self, _identifier: &str) -> Result<bool, LimiterError> {
            Err(LimiterError("connection reset".into()))
        }

        async fn record(&self, _identifier: &str) -> Result<(), LimiterError> {
            Ok(())
        }

        async fn cleanup(&self) -> Result<(), LimiterError> {
            Ok(())
        }

        fn config(&self) -> &RateLimitConfig {
            &self.0
        }
    }

    fn contact() -> ContactConfig {
        ContactConfig {
            to_address: "owner@example.com".into(),
            from_address: "Contact Form <noreply@example.com>".into(),
        }
    }

    #[tokio::test]
    async fn test_limiter_fault_becomes_unexpected() {
        let service = ContactService::new(
            ContactValidator::default(),
            Arc::new(BrokenStore(RateLimitConfig::default())),
            Arc::new(AcceptAll),
            contact(),
        );

        let result = service
            .submit(SubmissionRequest::new("Ada", "ada@example.com", "Hello there, friend."))
            .await;

        assert_eq!(
            result,
            SubmissionResult::Failed {
                kind: FailureKind::Unexpected,
                reason: UNEXPECTED_MESSAGE.to_string(),
            }
        );
    }

    #[test]
    fn test_rate_limit_message_states_quota() {
        let result: SubmissionResult = SubmissionError::RateLimited {
            identifier: "ada@example.com".into(),
            max_submissions: 3,
            window: "hour".into(),
        }
        .into();

        assert_eq!(
            result.text(),
            "Rate limit exceeded. Please try again later (max 3 submissions per hour)."
        );
        assert_eq!(result.failure_kind(), Some(FailureKind::RateLimited));
    }

    #[test]
    fn test_malformed_provider_response_is_unexpected() {
        let result: SubmissionResult =
            SubmissionError::Delivery(DeliveryError::MalformedResponse("eof".into())).into();
        assert_eq!(result.failure_kind(), Some(FailureKind::Unexpected));
        assert_eq!(result.text(), UNEXPECTED_MESSAGE);
    }
}
