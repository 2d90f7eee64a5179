//! Middleware: handler-to-handler transformations.
//!
//! # Design Decisions
//! - A group's middleware list is applied with the first declared layer
//!   outermost, so its side effects are observed first on every request
//! - Wrapping never hides the inner handler's exported route table: the
//!   layered handler re-exports it with the same middleware applied to
//!   every entry, so a wrapped router can still be nested and flattened

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::FutureExt;

use crate::http::{IncomingRequest, ServerResponse};
use crate::routing::handler::{BoxedHandler, Handler, HandlerFuture};
use crate::routing::router::FlatEntry;

type LayerFn = dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync;

/// A function turning one handler into another.
#[derive(Clone)]
pub struct Middleware {
    name: &'static str,
    layer: Arc<LayerFn>,
}

impl Middleware {
    /// Build from a raw handler transformation.
    pub fn new<F>(name: &'static str, layer: F) -> Self
    where
        F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
    {
        Self {
            name,
            layer: Arc::new(layer),
        }
    }

    /// Build an around-middleware from an async function receiving the
    /// request and the rest of the chain.
    ///
    /// ```
    /// use assemble::routing::{Middleware, Next};
    ///
    /// let log = Middleware::from_fn("log", |req, next: Next| async move {
    ///     tracing::info!(path = %req.path, "request");
    ///     next.run(req).await
    /// });
    /// # let _ = log;
    /// ```
    pub fn from_fn<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn(IncomingRequest, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServerResponse> + Send + 'static,
    {
        let f = Arc::new(f);
        Self::new(name, move |inner: BoxedHandler| -> BoxedHandler {
            Arc::new(FromFn {
                f: Arc::clone(&f),
                next: Next(inner),
            })
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wrap `inner`, keeping its export capability.
    pub fn apply(&self, inner: BoxedHandler) -> BoxedHandler {
        let wrapped = (self.layer)(Arc::clone(&inner));
        Arc::new(Layered {
            wrapped,
            inner,
            middleware: self.clone(),
        })
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name).finish()
    }
}

/// Apply `middlewares` around `handler`, first element outermost.
pub fn apply_all(middlewares: &[Middleware], handler: BoxedHandler) -> BoxedHandler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |acc, middleware| middleware.apply(acc))
}

/// The remainder of the chain, handed to [`Middleware::from_fn`] closures.
#[derive(Clone)]
pub struct Next(BoxedHandler);

impl Next {
    pub fn run(self, request: IncomingRequest) -> HandlerFuture {
        self.0.handle(request)
    }
}

struct FromFn<F> {
    f: Arc<F>,
    next: Next,
}

impl<F, Fut> Handler for FromFn<F>
where
    F: Fn(IncomingRequest, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ServerResponse> + Send + 'static,
{
    fn handle(&self, request: IncomingRequest) -> HandlerFuture {
        (self.f)(request, self.next.clone()).boxed()
    }
}

/// Result of [`Middleware::apply`].
struct Layered {
    wrapped: BoxedHandler,
    inner: BoxedHandler,
    middleware: Middleware,
}

impl Handler for Layered {
    fn handle(&self, request: IncomingRequest) -> HandlerFuture {
        self.wrapped.handle(request)
    }

    fn export(&self) -> Vec<FlatEntry> {
        self.inner
            .export()
            .into_iter()
            .map(|entry| FlatEntry {
                handler: self.middleware.apply(entry.handler),
                ..entry
            })
            .collect()
    }
}
