//! Datastore subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     backing file (JSON)
//!         → persist.rs (load table map)
//!         → Datastore (in-memory tables)
//!
//! Per mutation:
//!     handler call (insert/update/delete)
//!         → datastore.rs (mutate in-memory rows)
//!         → persist.rs (write full table map back)
//! ```
//!
//! # Design Decisions
//! - Single authoritative in-memory copy; reads return clones
//! - Every mutation writes the whole file; last write wins
//! - No multi-writer isolation (accepted limitation)

pub mod datastore;
pub mod persist;

pub use datastore::Datastore;
pub use persist::{Record, StoreError, Tables};
