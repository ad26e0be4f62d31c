//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, target)
//!     → router.rs (ordered route table scan)
//!     → template.rs (segment matching, parameter extraction)
//!     → Return: handler + RouteMatch, or NoMatch
//!
//! Route Compilation (at startup):
//!     template strings
//!     → Compile into tagged segments (literal | parameter)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Templates compiled at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - First registered match wins (declaration order)

pub mod router;
pub mod template;

pub use router::{Route, RouteTable};
pub use template::{RouteMatch, RouteTemplate, TemplateError};
