// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Relay Service
//!
//! Receives contact form submissions over HTTP, validates and rate-limits
//! them, and forwards each accepted one to the site owner by email.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT_EMAIL`: Owner mailbox (required)
//! - `CONTACT_FROM`: Sender of notifications (default: Contact Form <noreply@localhost>)
//! - `RESEND_API_KEY`: Email provider key (required)
//! - `RESEND_API_BASE`: Email provider base URL (default: https://api.resend.com/)
//! - `DELIVERY_TIMEOUT_SECS`: Provider request timeout (default: 10)
//! - `MAX_SUBMISSIONS`: Submissions per email per window (default: 3)
//! - `RATE_LIMIT_WINDOW_MS`: Window length (default: 3600000)
//! - `METRICS_ENABLED`: Serve `/metrics` (default: true)
//! - `CORS_ALLOWED_ORIGINS`: Comma separated browser origins (default: any)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_form_relay::{
    config::Config,
    handlers::{router, AppState},
    limiter::InMemoryLimiter,
    metrics::SubmissionMetrics,
    pipeline::ContactService,
    validator::ContactValidator,
    ResendClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_submissions = config.rate_limit.max_submissions,
        window_ms = config.rate_limit.window_ms,
        provider = %config.delivery.api_base,
        "Starting contact form relay"
    );

    // The limiter lives for the whole process; nothing prunes it in the
    // background, each submission runs its cleanup pass.
    let limiter = Arc::new(InMemoryLimiter::new(config.rate_limit.clone()));
    let sender = Arc::new(ResendClient::new(&config.delivery)?);
    let service = ContactService::new(
        ContactValidator::new(config.validation.clone()),
        limiter,
        sender,
        config.contact.clone(),
    );

    let state = Arc::new(AppState {
        service,
        metrics: SubmissionMetrics::new()?,
        config: config.clone(),
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
