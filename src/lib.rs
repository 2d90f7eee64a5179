//! Request-routing core for a small HTTP framework.
//!
//! Routes are declared as a tree of (verb, path, handler) entries, possibly
//! nested into groups sharing a path prefix and middleware. The tree is
//! flattened once into an immutable table; each request is matched against
//! it with positional parameter extraction, falling back to the nearest
//! declared not-found scope.
//!
//! ```
//! use assemble::http::{IncomingRequest, ServerResponse};
//! use assemble::routing::{context, get, handler_fn, not_found, Router};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router = Router::new(vec![
//!     get("/", handler_fn(|_| async { ServerResponse::ok("home") })),
//!     context("/user", Vec::new(), vec![
//!         get("/:id", handler_fn(|req: IncomingRequest| async move {
//!             ServerResponse::json(&req.context)
//!         })),
//!     ]),
//!     not_found(handler_fn(|_| async { ServerResponse::not_found("nope") })),
//! ])
//! .unwrap();
//!
//! let res = router.dispatch(IncomingRequest::new("GET", "/user/2")).await;
//! assert_eq!(res.text(), r#"{"id":2}"#);
//! # }
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{HttpServer, IncomingRequest, ServerResponse};
pub use routing::{Router, Verb};
