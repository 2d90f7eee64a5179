//! Route declarations.
//!
//! # Responsibilities
//! - Normalize declared paths (leading slash, no trailing slash)
//! - Pair a verb and a path with a handler or a nested router
//! - Provide the declaration surface (`get`, `post`, ..., `context`)
//!
//! # Design Decisions
//! - Declarations are immutable once built
//! - A group is a route with verb `ANY` whose target is the nested router,
//!   so method filtering is left to its children during flattening

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::handler::BoxedHandler;
use crate::routing::middleware::Middleware;
use crate::routing::router::Router;

/// HTTP verb of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    /// Matches every request method.
    Any,
    /// Fallback for a scope where nothing else matched.
    NotFound,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
            Verb::Any => "ANY",
            Verb::NotFound => "NOT_FOUND",
        }
    }

    /// Whether a flat entry with this verb answers `method`.
    pub fn accepts(&self, method: &str) -> bool {
        match self {
            Verb::Any => true,
            Verb::NotFound => false,
            verb => verb.as_str().eq_ignore_ascii_case(method),
        }
    }

    /// Whether a child entry with verb `child` survives under a parent
    /// declared with this verb.
    pub(crate) fn admits(&self, child: Verb) -> bool {
        *self == Verb::Any || child == Verb::Any || *self == child
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let verb = match s.to_ascii_uppercase().as_str() {
            "GET" => Verb::Get,
            "POST" => Verb::Post,
            "PUT" => Verb::Put,
            "PATCH" => Verb::Patch,
            "DELETE" => Verb::Delete,
            "OPTIONS" => Verb::Options,
            "ANY" => Verb::Any,
            "NOT_FOUND" => Verb::NotFound,
            _ => return Err(RouteError::UnknownVerb(s.to_string())),
        };
        Ok(verb)
    }
}

/// Canonical form of a declared path: leading `/`, no trailing `/` unless
/// the path is the root.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// What a route dispatches to.
#[derive(Clone)]
pub enum Target {
    Leaf(BoxedHandler),
    SubRouter(Arc<Router>),
}

impl Target {
    pub(crate) fn as_handler(&self) -> BoxedHandler {
        match self {
            Target::Leaf(handler) => Arc::clone(handler),
            Target::SubRouter(router) => Arc::clone(router) as BoxedHandler,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Leaf(_) => f.write_str("Leaf"),
            Target::SubRouter(router) => f.debug_tuple("SubRouter").field(&router.len()).finish(),
        }
    }
}

/// Terminal argument of a group.
pub enum Children {
    Handler(BoxedHandler),
    Routes(Vec<Route>),
    Router(Arc<Router>),
}

impl From<BoxedHandler> for Children {
    fn from(handler: BoxedHandler) -> Self {
        Children::Handler(handler)
    }
}

impl From<Vec<Route>> for Children {
    fn from(routes: Vec<Route>) -> Self {
        Children::Routes(routes)
    }
}

impl From<Router> for Children {
    fn from(router: Router) -> Self {
        Children::Router(Arc::new(router))
    }
}

impl From<Arc<Router>> for Children {
    fn from(router: Arc<Router>) -> Self {
        Children::Router(router)
    }
}

/// One declared (verb, path, target, middleware) unit.
#[derive(Clone, Debug)]
pub struct Route {
    pub(crate) verb: Verb,
    pub(crate) path: String,
    pub(crate) target: Target,
    pub(crate) middlewares: Vec<Middleware>,
}

impl Route {
    pub fn new(verb: Verb, path: &str, target: Target) -> Self {
        Self {
            verb,
            path: normalize_path(path),
            target,
            middlewares: Vec::new(),
        }
    }

    pub fn with_middlewares(mut self, middlewares: Vec<Middleware>) -> Self {
        self.middlewares = middlewares;
        self
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }
}

/// Route for `verb` at `path`.
pub fn route(verb: Verb, path: &str, handler: BoxedHandler) -> Route {
    Route::new(verb, path, Target::Leaf(handler))
}

pub fn get(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Get, path, handler)
}

pub fn post(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Post, path, handler)
}

pub fn put(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Put, path, handler)
}

pub fn patch(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Patch, path, handler)
}

pub fn delete(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Delete, path, handler)
}

pub fn options(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Options, path, handler)
}

pub fn any(path: &str, handler: BoxedHandler) -> Route {
    route(Verb::Any, path, handler)
}

/// Fallback for the enclosing scope.
pub fn not_found(handler: BoxedHandler) -> Route {
    route(Verb::NotFound, "/", handler)
}

/// Group `children` under `path`, wrapped by `middlewares` (first outermost).
///
/// A nested route list is validated when the enclosing router is built;
/// [`Group::build`] reports the same errors at declaration time.
pub fn context(
    path: &str,
    middlewares: impl IntoIterator<Item = Middleware>,
    children: impl Into<Children>,
) -> Route {
    let target = match children.into() {
        Children::Handler(handler) => Target::Leaf(handler),
        Children::Router(router) => Target::SubRouter(router),
        Children::Routes(routes) => Target::SubRouter(Arc::new(Router::unchecked(routes))),
    };
    Route::new(Verb::Any, path, target).with_middlewares(middlewares.into_iter().collect())
}

/// Step-by-step group declaration.
///
/// ```
/// use assemble::routing::{get, handler_fn, Group};
/// use assemble::http::ServerResponse;
///
/// let users = Group::new("/users")
///     .routes(vec![get("/", handler_fn(|_| async { ServerResponse::ok("all") }))])
///     .build()
///     .unwrap();
/// assert_eq!(users.path(), "/users");
/// ```
pub struct Group {
    path: String,
    middlewares: Vec<Middleware>,
    children: Option<Children>,
}

impl Group {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            middlewares: Vec::new(),
            children: None,
        }
    }

    /// Append a middleware. Earlier layers wrap later ones.
    pub fn layer(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn routes(mut self, routes: Vec<Route>) -> Self {
        self.children = Some(Children::Routes(routes));
        self
    }

    pub fn router(mut self, router: impl Into<Arc<Router>>) -> Self {
        self.children = Some(Children::Router(router.into()));
        self
    }

    pub fn handler(mut self, handler: BoxedHandler) -> Self {
        self.children = Some(Children::Handler(handler));
        self
    }

    /// Finish the group. Fails when no terminal children were given.
    pub fn build(self) -> RouteResult<Route> {
        let target = match self.children {
            None => return Err(RouteError::Context(self.path)),
            Some(Children::Handler(handler)) => Target::Leaf(handler),
            Some(Children::Router(router)) => Target::SubRouter(router),
            Some(Children::Routes(routes)) => {
                let router = Router::unchecked(routes);
                router.validate()?;
                Target::SubRouter(Arc::new(router))
            }
        };
        Ok(Route::new(Verb::Any, &self.path, target).with_middlewares(self.middlewares))
    }
}
