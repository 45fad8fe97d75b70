// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding window submission limiter.
//!
//! Each identifier (the submitter's lower-cased email) maps to the epoch
//! millisecond timestamps of its recorded submissions. A check counts the
//! timestamps strictly newer than `now - window`; the identifier is over
//! quota once that count reaches `max_submissions`.
//!
//! Stale timestamps are only removed by an explicit [`SubmissionLimiter::cleanup`]
//! call, which the submission pipeline makes once per attempt. That pass is
//! O(stored identifiers). The identifier is user supplied, so a sender that
//! varies the email field is not held back.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Failure of the backing store. The in-memory limiter never returns it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Rate limit store unavailable: {0}")]
pub struct LimiterError(pub String);

/// Per-identifier submission quota.
///
/// Implementations are shared across concurrent submissions. A check
/// followed by a record is not atomic; two simultaneous submissions for the
/// same identifier may both pass.
#[async_trait]
pub trait SubmissionLimiter: Send + Sync {
    /// Whether `identifier` already used its quota in the current window.
    /// Does not modify stored state.
    async fn is_exceeded(&self, identifier: &str) -> Result<bool, LimiterError>;

    /// Count a submission for `identifier` at the current time.
    async fn record(&self, identifier: &str) -> Result<(), LimiterError>;

    /// Drop timestamps outside the window and forget empty identifiers.
    async fn cleanup(&self) -> Result<(), LimiterError>;

    /// Quota parameters, used to word the rejection message.
    fn config(&self) -> &RateLimitConfig;
}

/// Process-local limiter.
pub struct InMemoryLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    submissions: RwLock<HashMap<String, Vec<i64>>>,
}

impl InMemoryLimiter {
    /// Create a limiter driven by the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a limiter driven by the given clock.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            submissions: RwLock::new(HashMap::new()),
        }
    }

    fn cutoff(&self) -> i64 {
        self.clock.now_millis() - self.config.window_ms
    }

    /// Submissions counted against `identifier` right now.
    pub async fn recorded(&self, identifier: &str) -> usize {
        let cutoff = self.cutoff();
        let submissions = self.submissions.read().await;
        submissions
            .get(identifier)
            .map(|timestamps| timestamps.iter().filter(|&&t| t > cutoff).count())
            .unwrap_or(0)
    }

    /// Number of identifiers currently stored, stale or not.
    pub async fn tracked_identifiers(&self) -> usize {
        self.submissions.read().await.len()
    }
}

#[async_trait]
impl SubmissionLimiter for InMemoryLimiter {
    async fn is_exceeded(&self, identifier: &str) -> Result<bool, LimiterError> {
        let count = self.recorded(identifier).await;
        let exceeded = count >= self.config.max_submissions as usize;
        if exceeded {
            debug!(%identifier, count, max = self.config.max_submissions, "Submission quota used up");
        }
        Ok(exceeded)
    }

    async fn record(&self, identifier: &str) -> Result<(), LimiterError> {
        let now = self.clock.now_millis();
        let mut submissions = self.submissions.write().await;
        submissions
            .entry(identifier.to_string())
            .or_default()
            .push(now);
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), LimiterError> {
        let cutoff = self.cutoff();
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();

        submissions.retain(|_, timestamps| {
            timestamps.retain(|&t| t > cutoff);
            !timestamps.is_empty()
        });

        let evicted = before - submissions.len();
        if evicted > 0 {
            debug!(evicted, remaining = submissions.len(), "Evicted idle identifiers");
        }
        Ok(())
    }

    fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}
