// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for contact form relay tests.
//!
//! Provides a recording email sender, a manually driven clock wired into a
//! limiter, and generators for valid and invalid submissions.

#![allow(dead_code)]

pub mod generators;
pub mod senders;

use contact_form_relay::{
    clock::ManualClock,
    config::{ContactConfig, RateLimitConfig},
    ContactService, ContactValidator, InMemoryLimiter,
};
use senders::RecordingSender;
use std::sync::Arc;
use std::time::Duration;

/// 2023-11-14T22:13:20Z
pub const START_MILLIS: i64 = 1_700_000_000_000;

pub const MINUTE: Duration = Duration::from_secs(60);

pub fn contact_config() -> ContactConfig {
    ContactConfig {
        to_address: "owner@example.com".to_string(),
        from_address: "Contact Form <noreply@example.com>".to_string(),
    }
}

/// A service wired to test doubles, with handles to drive and inspect them.
pub struct Fixture {
    pub service: ContactService,
    pub limiter: Arc<InMemoryLimiter>,
    pub sender: Arc<RecordingSender>,
    pub clock: ManualClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_sender(RecordingSender::accepting())
    }

    pub fn with_sender(sender: RecordingSender) -> Self {
        Self::build(sender, RateLimitConfig::default())
    }

    pub fn build(sender: RecordingSender, rate_limit: RateLimitConfig) -> Self {
        let clock = ManualClock::new(START_MILLIS);
        let limiter = Arc::new(InMemoryLimiter::with_clock(
            rate_limit,
            Arc::new(clock.clone()),
        ));
        let sender = Arc::new(sender);
        let service = ContactService::new(
            ContactValidator::default(),
            limiter.clone(),
            sender.clone(),
            contact_config(),
        );

        Self {
            service,
            limiter,
            sender,
            clock,
        }
    }
}
