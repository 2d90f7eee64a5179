//! Route flattening and dispatch.
//!
//! # Responsibilities
//! - Flatten a (possibly nested) route list into an ordered table
//! - Compose group middleware around every child entry
//! - Dispatch requests: exact match, then scoped NOT_FOUND, then 500
//!
//! # Design Decisions
//! - The table is built once in the constructor and never mutated
//! - Table order equals declaration (pre-order) order
//! - A router is itself a [`Handler`], so it nests like any other target
//! - Routing parameters are merged into the transport-supplied context

use std::fmt;
use std::time::Instant;

use futures_util::future::{self, FutureExt};

use crate::http::request::split_segments;
use crate::http::{IncomingRequest, ServerResponse};
use crate::observability::metrics;
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::export::{shadowed_routes, RouteTable};
use crate::routing::handler::{BoxedHandler, Handler, HandlerFuture};
use crate::routing::matcher::{NotFoundResolver, PathMatcher, PathPattern, Segment};
use crate::routing::middleware::apply_all;
use crate::routing::route::{normalize_path, Route, Verb};

/// A fully resolved table row: middleware already applied.
#[derive(Clone)]
pub struct FlatEntry {
    pub method: Verb,
    pub path: String,
    pub handler: BoxedHandler,
}

impl fmt::Debug for FlatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Flatten `routes` into table order.
pub fn flatten(routes: &[Route]) -> Vec<FlatEntry> {
    routes.iter().flat_map(flatten_route).collect()
}

fn flatten_route(route: &Route) -> Vec<FlatEntry> {
    let handler = route.target.as_handler();
    let exported = handler.export();
    if exported.is_empty() {
        return vec![FlatEntry {
            method: route.verb,
            path: route.path.clone(),
            handler: apply_all(&route.middlewares, handler),
        }];
    }
    exported
        .into_iter()
        .filter(|child| route.verb.admits(child.method))
        .map(|child| FlatEntry {
            method: child.method,
            path: join_paths(&route.path, &child.path),
            handler: apply_all(&route.middlewares, child.handler),
        })
        .collect()
}

fn join_paths(parent: &str, child: &str) -> String {
    normalize_path(&format!("{}{}", parent.trim_end_matches('/'), child))
}

/// An immutable dispatch table built from route declarations.
pub struct Router {
    entries: Vec<FlatEntry>,
    matcher: PathMatcher,
    fallbacks: NotFoundResolver,
}

impl Router {
    /// Build and validate a router.
    ///
    /// Routes that can never be reached because an earlier route covers
    /// them are reported with a warning; dispatch still follows
    /// declaration order.
    pub fn new(routes: Vec<Route>) -> RouteResult<Self> {
        let router = Self::unchecked(routes);
        router.validate()?;
        for shadow in shadowed_routes(&router.entries) {
            tracing::warn!(
                method = %shadow.method,
                path = %shadow.path,
                shadowed_by = %shadow.shadowed_by,
                "Route is already matched by an earlier route and will never be reached"
            );
        }
        tracing::debug!(
            entries = router.entries.len(),
            fallbacks = !router.fallbacks.is_empty(),
            "Router built"
        );
        Ok(router)
    }

    /// Build without validation; the enclosing router validates the
    /// flattened result.
    pub(crate) fn unchecked(routes: Vec<Route>) -> Self {
        let entries = flatten(&routes);
        let matcher = PathMatcher::new(&entries);
        let fallbacks = NotFoundResolver::new(&entries);
        Self {
            entries,
            matcher,
            fallbacks,
        }
    }

    /// Check every parameter segment of the table.
    pub(crate) fn validate(&self) -> RouteResult<()> {
        for entry in &self.entries {
            for segment in PathPattern::parse(&entry.path).segments() {
                if let Segment::Param(name) = segment {
                    if !is_identifier(name) {
                        return Err(RouteError::InvalidParameter {
                            path: entry.path.clone(),
                            segment: format!(":{}", name),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The flattened table, in dispatch order.
    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostic view of the table, grouped by verb.
    pub fn route_table(&self) -> RouteTable {
        RouteTable::from_entries(&self.entries)
    }

    /// Resolve and run the handler for `request`.
    pub async fn dispatch(&self, request: IncomingRequest) -> ServerResponse {
        self.handle(request).await
    }

    fn resolve(&self, request: &mut IncomingRequest) -> Option<(BoxedHandler, Outcome)> {
        let path = split_segments(&request.path);
        if let Some((handler, context)) = self.matcher.find(&request.method, &path) {
            tracing::debug!(method = %request.method, path = %request.path, params = context.len(), "Route matched");
            request.context.merge(context);
            return Some((handler, Outcome::Matched));
        }
        let handler = self.fallbacks.resolve(&path)?;
        tracing::debug!(method = %request.method, path = %request.path, "Falling back to not-found handler");
        Some((handler, Outcome::NotFound))
    }
}

impl Handler for Router {
    fn handle(&self, mut request: IncomingRequest) -> HandlerFuture {
        let start = Instant::now();
        let method = request.method.clone();
        match self.resolve(&mut request) {
            Some((handler, outcome)) => handler
                .handle(request)
                .map(move |response| {
                    metrics::record_dispatch(outcome.as_str(), &method, start);
                    response
                })
                .boxed(),
            None => {
                tracing::warn!(method = %request.method, path = %request.path, "No route matched");
                metrics::record_dispatch(Outcome::Unresolved.as_str(), &method, start);
                future::ready(ServerResponse::internal_error(format!("{} not found", request.path))).boxed()
            }
        }
    }

    fn export(&self) -> Vec<FlatEntry> {
        self.entries.clone()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("entries", &self.entries).finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Matched,
    NotFound,
    Unresolved,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::NotFound => "not_found",
            Outcome::Unresolved => "unresolved",
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
