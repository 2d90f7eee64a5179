//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at construction):
//!     Route[] (route.rs: verbs, groups, middleware lists)
//!     → router.rs (recursive flatten, middleware composition)
//!     → FlatEntry[] in declaration order
//!     → matcher.rs (compile patterns, split out NOT_FOUND scopes)
//!     → Freeze as immutable Router
//!
//! Per request:
//!     IncomingRequest (method, path)
//!     → PathMatcher (first exact-shape match, bind parameters)
//!     → NotFoundResolver (longest-prefix fallback scope)
//!     → handler, or a generic 500 when nothing applies
//! ```
//!
//! # Design Decisions
//! - Routers are immutable after construction (shared without locks)
//! - Deterministic: same declarations always flatten to the same table
//! - First match wins (declaration order)
//! - Shadowed routes are warned about, never rejected

pub mod error;
pub mod export;
pub mod handler;
pub mod matcher;
pub mod middleware;
pub mod route;
pub mod router;

pub use error::{RouteError, RouteResult};
pub use export::{shadowed_routes, RouteTable, Shadow};
pub use handler::{handler_fn, sync_handler_fn, BoxedHandler, Handler, HandlerFuture};
pub use matcher::{NotFoundResolver, PathMatcher, PathPattern, Segment};
pub use middleware::{Middleware, Next};
pub use route::{
    any, context, delete, get, normalize_path, not_found, options, patch, post, put, route, Children, Group,
    Route, Target, Verb,
};
pub use router::{flatten, FlatEntry, Router};
