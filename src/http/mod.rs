//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum catch-all, middleware layers)
//!     → [POST /tasks/import-csv] → import pipeline (streaming)
//!     → request.rs (JSON body, query decoding)
//!     → routing table → task handlers
//!     → status-coded Response
//! ```

pub mod request;
pub mod server;

pub use server::HttpServer;
