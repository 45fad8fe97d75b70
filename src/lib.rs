// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Relay
//!
//! Server side of a portfolio site's contact form:
//!
//! - Field validation (name, email grammar, message length)
//! - Per-sender quota over a sliding window (3 per hour default)
//! - Notification email to the site owner through a Resend-compatible API
//! - A success/failure result for every submission, never a raised error

pub mod clock;
pub mod config;
pub mod delivery;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod validator;

pub use config::Config;
pub use delivery::{EmailSender, ResendClient};
pub use limiter::{InMemoryLimiter, SubmissionLimiter};
pub use models::{SubmissionRequest, SubmissionResult};
pub use pipeline::ContactService;
pub use validator::{ContactValidator, ValidationError};
