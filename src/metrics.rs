// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for submission outcomes.

use crate::models::SubmissionResult;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct SubmissionMetrics {
    registry: Registry,
    outcomes: IntCounterVec,
}

impl SubmissionMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let outcomes = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact form submissions by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(outcomes.clone()))?;

        // Pre-create every series so scrapes show zeroes before traffic.
        for outcome in ["sent", "validation", "rate_limited", "delivery", "unexpected"] {
            outcomes.with_label_values(&[outcome]);
        }

        Ok(Self { registry, outcomes })
    }

    pub fn observe(&self, result: &SubmissionResult) {
        self.outcomes
            .with_label_values(&[result.outcome_label()])
            .inc();
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.outcomes.with_label_values(&[outcome]).get()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
