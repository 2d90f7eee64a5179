//! Route construction errors.

use thiserror::Error;

/// Errors raised while declaring routes or building a [`Router`](super::Router).
///
/// All of them are construction-time failures; a router is never built
/// from a declaration that produced one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// A route group was finalized without a handler or a nested route list.
    #[error("Context Error: group `{0}` has neither a handler nor a route list")]
    Context(String),

    /// A `:` segment is not followed by an identifier.
    #[error("invalid parameter segment `{segment}` in `{path}`")]
    InvalidParameter { path: String, segment: String },

    /// A method name that is not one of the known verbs.
    #[error("unknown HTTP verb `{0}`")]
    UnknownVerb(String),
}

/// Result type for route construction.
pub type RouteResult<T> = Result<T, RouteError>;
