//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the matching route for a method + request target
//! - Return the bound handler and extracted parameters, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes are tried in declaration order; first match wins. No
//!   best-match or most-specific-match resolution is attempted; callers
//!   that register overlapping templates get the earlier one.
//! - Generic over the handler payload so the table stays decoupled from
//!   any particular handler representation

use axum::http::Method;

use crate::routing::template::{RouteMatch, RouteTemplate, TemplateError};

/// A single registered route.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub method: Method,
    pub template: RouteTemplate,
    pub handler: H,
}

/// An ordered table of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route. Template compilation errors surface here, at
    /// startup, as configuration errors.
    pub fn route(mut self, method: Method, template: &str, handler: H) -> Result<Self, TemplateError> {
        let template = RouteTemplate::compile(template)?;
        self.routes.push(Route {
            method,
            template,
            handler,
        });
        Ok(self)
    }

    /// Find the first route matching the method and request target.
    pub fn lookup(&self, method: &Method, target: &str) -> Option<(&H, RouteMatch)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.template.exec(target).map(|m| (&route.handler, m)))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable<&'static str> {
        RouteTable::new()
            .route(Method::GET, "/tasks", "list")
            .unwrap()
            .route(Method::POST, "/tasks", "create")
            .unwrap()
            .route(Method::PUT, "/tasks/:id", "update")
            .unwrap()
            .route(Method::PATCH, "/tasks/:id/complete", "complete")
            .unwrap()
    }

    #[test]
    fn test_method_discriminates() {
        let table = table();

        let (handler, _) = table.lookup(&Method::GET, "/tasks").unwrap();
        assert_eq!(*handler, "list");

        let (handler, _) = table.lookup(&Method::POST, "/tasks").unwrap();
        assert_eq!(*handler, "create");

        assert!(table.lookup(&Method::DELETE, "/tasks").is_none());
    }

    #[test]
    fn test_params_flow_through() {
        let table = table();

        let (handler, matched) = table.lookup(&Method::PUT, "/tasks/7f3c").unwrap();
        assert_eq!(*handler, "update");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("7f3c"));
    }

    #[test]
    fn test_first_registered_wins() {
        // Both templates match "/tasks/special"; the earlier registration
        // is returned even though the later one is more specific.
        let table: RouteTable<&'static str> = RouteTable::new()
            .route(Method::GET, "/tasks/:id", "by-id")
            .unwrap()
            .route(Method::GET, "/tasks/special", "special")
            .unwrap();

        let (handler, _) = table.lookup(&Method::GET, "/tasks/special").unwrap();
        assert_eq!(*handler, "by-id");
    }

    #[test]
    fn test_no_match() {
        let table = table();
        assert!(table.lookup(&Method::GET, "/users").is_none());
    }
}
