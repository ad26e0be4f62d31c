//! Task domain: record type, input validation, endpoint handlers.
//!
//! # Data Flow
//! ```text
//! dispatch (http/server.rs)
//!     → handlers.rs (validate via schema.rs, read/mutate via store)
//!     → model.rs (Task ↔ datastore record)
//!     → status-coded Response
//! ```

pub mod handlers;
pub mod model;
pub mod schema;

pub use handlers::{routes, TaskRoute, TASKS_TABLE};
pub use model::Task;
