//! Handler abstraction.
//!
//! A handler answers one request. Composite handlers (routers, and
//! middleware layered over routers) also expose the flat route table they
//! stand for through [`Handler::export`], which is what lets a group be
//! flattened into its enclosing router.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::http::{IncomingRequest, ServerResponse};
use crate::routing::router::FlatEntry;

/// Future returned by every handler.
pub type HandlerFuture = BoxFuture<'static, ServerResponse>;

/// Shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Something that can answer a request.
pub trait Handler: Send + Sync {
    fn handle(&self, request: IncomingRequest) -> HandlerFuture;

    /// Flat entries this handler stands for. Leaf handlers export nothing.
    fn export(&self) -> Vec<FlatEntry> {
        Vec::new()
    }
}

struct AsyncFn<F>(F);

impl<F, Fut> Handler for AsyncFn<F>
where
    F: Fn(IncomingRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ServerResponse> + Send + 'static,
{
    fn handle(&self, request: IncomingRequest) -> HandlerFuture {
        (self.0)(request).boxed()
    }
}

struct SyncFn<F>(F);

impl<F> Handler for SyncFn<F>
where
    F: Fn(IncomingRequest) -> ServerResponse + Send + Sync + 'static,
{
    fn handle(&self, request: IncomingRequest) -> HandlerFuture {
        future::ready((self.0)(request)).boxed()
    }
}

/// Wrap an async function as a handler.
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(IncomingRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ServerResponse> + Send + 'static,
{
    Arc::new(AsyncFn(f))
}

/// Wrap a synchronous function as a handler.
pub fn sync_handler_fn<F>(f: F) -> BoxedHandler
where
    F: Fn(IncomingRequest) -> ServerResponse + Send + Sync + 'static,
{
    Arc::new(SyncFn(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_async_and_sync_handlers() {
        let a = handler_fn(|req: IncomingRequest| async move { ServerResponse::ok(req.path) });
        let s = sync_handler_fn(|req| ServerResponse::not_found(req.method));

        let res = a.handle(IncomingRequest::new("GET", "/a")).await;
        assert_eq!(res.text(), "/a");
        let res = s.handle(IncomingRequest::new("POST", "/s")).await;
        assert_eq!(res.status_code, 404);
        assert_eq!(res.text(), "POST");

        assert!(a.export().is_empty());
        assert!(s.export().is_empty());
    }
}
