// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission records exchanged with the presentation layer.

use serde::{Deserialize, Serialize};

/// Raw contact form fields as posted by the browser.
///
/// Missing fields decode as empty strings so they fail validation rather
/// than request decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl SubmissionRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }
}

/// A request that passed every field rule.
///
/// Only `ContactValidator` constructs this, so holding one proves the
/// fields were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission(SubmissionRequest);

impl ValidatedSubmission {
    pub(crate) fn new(request: SubmissionRequest) -> Self {
        Self(request)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    /// Rate limit key: the lower-cased email address.
    pub fn identifier(&self) -> String {
        self.0.email.to_lowercase()
    }
}

/// Why a submission was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    RateLimited,
    Delivery,
    Unexpected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::RateLimited => "rate_limited",
            Self::Delivery => "delivery",
            Self::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Sent { message: String },
    Failed { kind: FailureKind, reason: String },
}

impl SubmissionResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Sent { .. } => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }

    /// The user-facing text, success message or failure reason.
    pub fn text(&self) -> &str {
        match self {
            Self::Sent { message } => message,
            Self::Failed { reason, .. } => reason,
        }
    }

    /// Metrics label for the outcome.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Self::Sent { .. } => "sent",
            Self::Failed { kind, .. } => kind.as_str(),
        }
    }
}

/// Wire form of a `SubmissionResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SubmissionResult> for SubmissionResponse {
    fn from(result: &SubmissionResult) -> Self {
        match result {
            SubmissionResult::Sent { message } => Self {
                success: true,
                message: Some(message.clone()),
                error: None,
            },
            SubmissionResult::Failed { reason, .. } => Self {
                success: false,
                message: None,
                error: Some(reason.clone()),
            },
        }
    }
}
