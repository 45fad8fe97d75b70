// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact form field validator.
//!
//! Rules, checked in order:
//! - name: 2..=100 characters
//! - email: a bare `local@domain.tld` address; no display name, no domain
//!   literal, no deliverability check
//! - message: 10..=1000 characters
//!
//! Lengths count Unicode scalar values, so a character outside the Basic
//! Multilingual Plane (an emoji) counts once, where a browser's UTF-16
//! `length` counts it twice.
//!
//! All violations are collected; the first one is what the form displays.

use crate::config::ValidationConfig;
use crate::models::{SubmissionRequest, ValidatedSubmission};
use email_address::{EmailAddress, Options};
use thiserror::Error;
use tracing::debug;

/// Form field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Message => write!(f, "message"),
        }
    }
}

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: Field,
    pub message: String,
}

/// One or more field violations, in check order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", first_message_of(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations.first()
    }

    /// Message of the first violation, or a generic one.
    pub fn first_message(&self) -> &str {
        first_message_of(&self.violations)
    }

    /// Violation reported for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }
}

/// Contact form validator.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    config: ValidationConfig,
}

impl Default for ContactValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl ContactValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn check_name(&self, name: &str) -> Option<String> {
        check_length(
            "Name",
            name,
            self.config.name_min,
            self.config.name_max,
        )
    }

    pub fn check_email(&self, email: &str) -> Option<String> {
        if is_plain_address(email) {
            None
        } else {
            Some("Please enter a valid email address".to_string())
        }
    }

    pub fn check_message(&self, message: &str) -> Option<String> {
        check_length(
            "Message",
            message,
            self.config.message_min,
            self.config.message_max,
        )
    }

    /// Validate a complete submission.
    pub fn validate(
        &self,
        request: SubmissionRequest,
    ) -> Result<ValidatedSubmission, ValidationError> {
        let checks = [
            (Field::Name, self.check_name(&request.name)),
            (Field::Email, self.check_email(&request.email)),
            (Field::Message, self.check_message(&request.message)),
        ];

        let violations: Vec<FieldViolation> = checks
            .into_iter()
            .filter_map(|(field, failure)| failure.map(|message| FieldViolation { field, message }))
            .collect();

        if violations.is_empty() {
            debug!("Submission fields valid");
            Ok(ValidatedSubmission::new(request))
        } else {
            debug!(
                fields = ?violations.iter().map(|v| v.field).collect::<Vec<_>>(),
                "Submission fields invalid"
            );
            Err(ValidationError { violations })
        }
    }
}

/// Whether `email` is a bare address with a dotted domain.
///
/// Display names (`Ada <ada@example.com>`) would give one mailbox several
/// rate limit identifiers and end up in the notification's reply-to.
pub fn is_plain_address(email: &str) -> bool {
    let options = Options::default()
        .without_display_text()
        .without_domain_literal()
        .with_required_tld();
    EmailAddress::parse_with_options(email, options).is_ok()
}

fn first_message_of(violations: &[FieldViolation]) -> &str {
    violations
        .first()
        .map(|v| v.message.as_str())
        .unwrap_or("Invalid form data")
}

/// Inclusive character-count check.
fn check_length(label: &str, value: &str, min: usize, max: usize) -> Option<String> {
    let len = value.chars().count();
    if len < min {
        Some(format!("{label} must be at least {min} characters"))
    } else if len > max {
        Some(format!("{label} must be less than {max} characters"))
    } else {
        None
    }
}
