// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Submission generators.

use contact_form_relay::SubmissionRequest;

/// A submission that passes every field rule.
pub fn valid(email: &str) -> SubmissionRequest {
    SubmissionRequest::new(
        "Ada Lovelace",
        email,
        "I enjoyed your projects and would like to talk about a role.",
    )
}

/// Submissions that each break exactly one rule, labelled by the rule.
pub fn invalid() -> Vec<(&'static str, SubmissionRequest)> {
    let message = "I enjoyed your projects and would like to talk.";
    vec![
        ("empty name", SubmissionRequest::new("", "ada@example.com", message)),
        ("one character name", SubmissionRequest::new("A", "ada@example.com", message)),
        (
            "101 character name",
            SubmissionRequest::new("n".repeat(101), "ada@example.com", message),
        ),
        ("missing at sign", SubmissionRequest::new("Ada", "ada.example.com", message)),
        ("missing local part", SubmissionRequest::new("Ada", "@example.com", message)),
        ("missing domain", SubmissionRequest::new("Ada", "ada@", message)),
        ("empty email", SubmissionRequest::new("Ada", "", message)),
        (
            "display name mailbox",
            SubmissionRequest::new("Ada", "Ada <ada@example.com>", message),
        ),
        ("domain literal", SubmissionRequest::new("Ada", "ada@[127.0.0.1]", message)),
        ("domain without tld", SubmissionRequest::new("Ada", "ada@localhost", message)),
        ("short message", SubmissionRequest::new("Ada", "ada@example.com", "Hi there")),
        (
            "1001 character message",
            SubmissionRequest::new("Ada", "ada@example.com", "m".repeat(1001)),
        ),
    ]
}

/// Case variants of one address.
pub fn case_variants(email: &str) -> Vec<String> {
    vec![
        email.to_lowercase(),
        email.to_uppercase(),
        email
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { c.to_ascii_uppercase() } else { c })
            .collect(),
    ]
}
