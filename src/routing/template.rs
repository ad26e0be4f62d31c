//! Route template compilation and matching.
//!
//! # Responsibilities
//! - Compile path templates (`/tasks/:id/complete`) into segment lists
//! - Match concrete request paths against compiled templates
//! - Extract named parameter values and the raw query string
//!
//! # Design Decisions
//! - Tagged variants (literal vs parameter segment) instead of regex,
//!   to guarantee O(n) matching
//! - Malformed templates fail at compile time (startup), never per request
//! - Parameter segments capture any non-empty, non-slash value
//! - The query string is split off before matching and returned raw

use std::collections::HashMap;

/// One segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must match the request segment exactly (case-sensitive).
    Literal(String),
    /// Captures the request segment under the given name.
    Param(String),
}

/// Errors raised while compiling a route template.
///
/// These are configuration errors: they abort startup rather than
/// surfacing on a request path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("route template {0:?} must start with '/'")]
    MissingLeadingSlash(String),
    #[error("route template {0:?} contains an empty segment")]
    EmptySegment(String),
    #[error("route template {0:?} contains a parameter with no name")]
    EmptyParamName(String),
    #[error("route template {0:?} binds parameter {1:?} more than once")]
    DuplicateParam(String, String),
}

/// Result of a successful match: bound parameters plus the raw query
/// string (without the leading `?`), if one was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub params: HashMap<String, String>,
    pub query: Option<String>,
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    segments: Vec<Segment>,
    raw: String,
}

impl RouteTemplate {
    /// Compile a template string into a matcher.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| TemplateError::MissingLeadingSlash(template.to_string()))?;

        let mut segments = Vec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                return Err(TemplateError::EmptySegment(template.to_string()));
            }
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(TemplateError::EmptyParamName(template.to_string()));
                }
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                if duplicate {
                    return Err(TemplateError::DuplicateParam(
                        template.to_string(),
                        name.to_string(),
                    ));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            segments,
            raw: template.to_string(),
        })
    }

    /// Returns true if the path is structurally compatible with this
    /// template, ignoring captured values.
    pub fn test(&self, path: &str) -> bool {
        self.match_segments(path).is_some()
    }

    /// Match a concrete request target (path plus optional query string).
    ///
    /// Returns the bound parameters and raw query string on a match,
    /// `None` otherwise.
    pub fn exec(&self, target: &str) -> Option<RouteMatch> {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let params = self.match_segments(path)?;
        Some(RouteMatch { params, query })
    }

    /// The template string this matcher was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn match_segments(&self, path: &str) -> Option<HashMap<String, String>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(expected) => {
                    if part != expected {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template() {
        let template = RouteTemplate::compile("/tasks").unwrap();

        assert!(template.test("/tasks"));
        assert!(!template.test("/tasks/123"));
        assert!(!template.test("/users"));
        assert!(!template.test("/tasks/"));
    }

    #[test]
    fn test_param_capture() {
        let template = RouteTemplate::compile("/tasks/:id").unwrap();

        let matched = template.exec("/tasks/abc-123").unwrap();
        assert_eq!(matched.params.get("id").map(String::as_str), Some("abc-123"));
        assert_eq!(matched.query, None);

        assert!(template.exec("/tasks").is_none());
        assert!(template.exec("/tasks/abc/extra").is_none());
    }

    #[test]
    fn test_trailing_literal_after_param() {
        let template = RouteTemplate::compile("/tasks/:id/complete").unwrap();

        let matched = template.exec("/tasks/42/complete").unwrap();
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));

        assert!(template.exec("/tasks/42/delete").is_none());
        assert!(template.exec("/tasks/42").is_none());
    }

    #[test]
    fn test_query_string_captured_raw() {
        let template = RouteTemplate::compile("/tasks").unwrap();

        let matched = template.exec("/tasks?search=milk&x=1").unwrap();
        assert_eq!(matched.query.as_deref(), Some("search=milk&x=1"));

        // Query string never participates in matching.
        assert!(template.exec("/users?search=milk").is_none());
    }

    #[test]
    fn test_empty_param_value_rejected() {
        let template = RouteTemplate::compile("/tasks/:id").unwrap();
        assert!(template.exec("/tasks/").is_none());
    }

    #[test]
    fn test_malformed_templates() {
        assert_eq!(
            RouteTemplate::compile("tasks").unwrap_err(),
            TemplateError::MissingLeadingSlash("tasks".into())
        );
        assert_eq!(
            RouteTemplate::compile("/tasks//:id").unwrap_err(),
            TemplateError::EmptySegment("/tasks//:id".into())
        );
        assert_eq!(
            RouteTemplate::compile("/tasks/:").unwrap_err(),
            TemplateError::EmptyParamName("/tasks/:".into())
        );
        assert_eq!(
            RouteTemplate::compile("/a/:id/b/:id").unwrap_err(),
            TemplateError::DuplicateParam("/a/:id/b/:id".into(), "id".into())
        );
    }
}
