//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; request IDs attached by middleware
//! - Errors surface as log events plus HTTP statuses; there is no
//!   separate reporting layer

pub mod logging;
