//! Request-side collaborators: body materialization and query decoding.
//!
//! # Responsibilities
//! - Materialize a request body as a parsed JSON value before handlers run
//! - Decode a raw query string into a field map
//!
//! # Design Decisions
//! - Empty or unparsable bodies become `Value::Null` rather than an
//!   error; handlers treat null as an invalid shape
//! - Query decoding is form-urlencoded; repeated keys keep the last value

use std::collections::HashMap;

use axum::body::Body;
use serde_json::Value;

/// Read the whole body and parse it as JSON. Tolerates empty and absent
/// bodies, yielding `Value::Null`.
pub async fn materialize_json(body: Body) -> Value {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Decode a raw query string (without the leading `?`) into a map.
pub fn decode_query(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}
