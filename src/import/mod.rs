//! CSV import subsystem.
//!
//! # Data Flow
//! ```text
//! POST /tasks/import-csv body (chunk stream)
//!     → csv.rs parse_rows (per-chunk line split)
//!     → bounded task group → create-task handler → datastore
//!     → per-row outcome → mpsc → streaming ndjson response
//! ```

pub mod csv;

pub use csv::{CsvImporter, RowOutcome};
