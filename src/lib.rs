//! Task API service library.

pub mod config;
pub mod http;
pub mod import;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;
pub mod tasks;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::Datastore;
