//! Inbound request contract.
//!
//! # Responsibilities
//! - Carry method, path, headers and body handed over by the transport
//! - Hold the per-request routing context (extracted path parameters)
//! - Split the path into routing segments
//!
//! # Design Decisions
//! - Method kept as a string; routing compares it case-insensitively
//! - Context is built fresh for every request and owned by it
//! - Repeated slashes are insignificant (empty segments dropped)

use std::collections::BTreeMap;
use std::fmt;

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::Serialize;

/// Value bound to a path parameter.
///
/// Segments whose numeric value is a finite integer within `i64` become
/// numbers (`2`, `1.0`, `1e3`); everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
}

impl ParamValue {
    /// Coerce a raw path segment.
    pub fn parse(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return ParamValue::Number(n);
        }
        // 2^63 is exactly representable; anything at or above it overflows.
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                ParamValue::Number(f as i64)
            }
            _ => ParamValue::Text(raw.to_string()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// Per-request mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Context(BTreeMap<String, ParamValue>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(name.into(), value)
    }

    /// Merge `other` into this context. Keys from `other` win.
    pub fn merge(&mut self, other: Context) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, ParamValue)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A request as seen by handlers and middleware.
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub method: String,
    /// URL path only, no query string.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub context: Context,
}

impl IncomingRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.path)
    }

    /// Shortcut for a header value that is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_coercion() {
        assert_eq!(ParamValue::parse("2"), ParamValue::Number(2));
        assert_eq!(ParamValue::parse("-14"), ParamValue::Number(-14));
        assert_eq!(ParamValue::parse("2a"), ParamValue::Text("2a".into()));
        assert_eq!(ParamValue::parse("1.5"), ParamValue::Text("1.5".into()));
        // Overflows i64: stays text
        assert_eq!(
            ParamValue::parse("99999999999999999999"),
            ParamValue::Text("99999999999999999999".into())
        );
    }

    #[test]
    fn test_param_value_coercion() {
        assert_eq!(ParamValue::parse("2"), ParamValue::Number(2));
        assert_eq!(ParamValue::parse("-7"), ParamValue::Number(-7));
        assert_eq!(ParamValue::parse("1.0"), ParamValue::Number(1));
        assert_eq!(ParamValue::parse("1e3"), ParamValue::Number(1000));
        assert_eq!(ParamValue::parse("1.5"), ParamValue::Text("1.5".into()));
        assert_eq!(ParamValue::parse("2a"), ParamValue::Text("2a".into()));
        assert_eq!(ParamValue::parse("inf"), ParamValue::Text("inf".into()));
        assert_eq!(ParamValue::parse("NaN"), ParamValue::Text("NaN".into()));
        assert_eq!(ParamValue::parse("1e30"), ParamValue::Text("1e30".into()));
    }

    #[test]
    fn test_param_value_accessors() {
        let number = ParamValue::parse("42");
        assert_eq!(number.as_i64(), Some(42));
        assert_eq!(number.as_str(), None);
        assert_eq!(number.to_string(), "42");

        let text = ParamValue::parse("slug");
        assert_eq!(text.as_i64(), None);
        assert_eq!(text.as_str(), Some("slug"));
    }

    #[test]
    fn test_segments_ignore_repeated_slashes() {
        let req = IncomingRequest::new("GET", "//user///2/");
        assert_eq!(req.segments(), vec!["user", "2"]);
        assert!(IncomingRequest::new("GET", "/").segments().is_empty());
    }

    #[test]
    fn test_context_serializes_numbers_and_strings() {
        let mut ctx = Context::new();
        ctx.insert("id", ParamValue::Number(2));
        ctx.insert("slug", ParamValue::Text("2a".into()));
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"id":2,"slug":"2a"}"#);
    }

    #[test]
    fn test_context_merge_overwrites() {
        let mut ctx: Context = [("id".to_string(), ParamValue::Text("x".into()))]
            .into_iter()
            .collect();
        let routed: Context = [("id".to_string(), ParamValue::Number(7))].into_iter().collect();
        ctx.merge(routed);
        assert_eq!(ctx.get("id"), Some(&ParamValue::Number(7)));
        assert_eq!(ctx.len(), 1);
    }
}
