//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Honor `RUST_LOG` overrides, with a sensible default filter
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log level configurable via environment

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasks_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
