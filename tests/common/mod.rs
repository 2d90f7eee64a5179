//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use assemble::http::{IncomingRequest, ServerResponse};
use assemble::routing::{
    context, delete, get, handler_fn, not_found, options, patch, post, put, BoxedHandler, Middleware, Next, Router,
};

/// Per-test middleware observations.
#[derive(Default, Clone)]
pub struct Probe {
    pub first: Arc<AtomicU32>,
    pub second: Arc<AtomicU32>,
    pub order: Arc<Mutex<Vec<&'static str>>>,
}

#[allow(dead_code)]
impl Probe {
    pub fn first_count(&self) -> u32 {
        self.first.load(Ordering::SeqCst)
    }

    pub fn second_count(&self) -> u32 {
        self.second.load(Ordering::SeqCst)
    }

    pub fn order(&self) -> Vec<&'static str> {
        self.order.lock().unwrap().clone()
    }
}

/// Handler answering with its route name, URL and routing context as JSON.
pub fn echo(name: &'static str) -> BoxedHandler {
    handler_fn(move |req: IncomingRequest| async move {
        ServerResponse::json(&serde_json::json!({
            "url": req.path,
            "path": name,
            "ctx": req.context,
        }))
    })
}

fn counting(name: &'static str, counter: Arc<AtomicU32>, order: Arc<Mutex<Vec<&'static str>>>) -> Middleware {
    Middleware::from_fn(name, move |req: IncomingRequest, next: Next| {
        counter.fetch_add(1, Ordering::SeqCst);
        order.lock().unwrap().push(name);
        next.run(req)
    })
}

/// The reference route tree: a root route, a `/post` group behind two
/// middlewares with its own fallback, a `/user` group with nested groups,
/// and a root fallback.
pub fn routes(probe: &Probe) -> Router {
    let first = || counting("first", Arc::clone(&probe.first), Arc::clone(&probe.order));
    let second = || counting("second", Arc::clone(&probe.second), Arc::clone(&probe.order));

    Router::new(vec![
        get("/", echo("get")),
        context(
            "/post",
            [first(), second()],
            vec![
                get("/", echo("post-get")),
                post("/", echo("post-post")),
                put("/", echo("post-put")),
                put("/test", echo("post-test-put")),
                delete("/", echo("post-delete")),
                not_found(handler_fn(|_| async { ServerResponse::not_found("post") })),
            ],
        ),
        context(
            "/user",
            [first()],
            vec![
                get("/", echo("user-get")),
                get("/test", echo("user-test-get")),
                context("/before-global", [second()], vec![get("/", echo("user-before-global-get"))]),
                get("/:id", echo("user-id-get")),
                post("/:id", echo("user-id-post")),
                context(
                    "/after-global",
                    [second()],
                    vec![
                        get("/", echo("user-after-global-get")),
                        delete("/", echo("user-after-global-delete")),
                    ],
                ),
                put("/:id/meh", echo("user-id-meh-put")),
                patch("/:id", echo("user-id-patch")),
                options("/", echo("user-options")),
            ],
        ),
        not_found(handler_fn(|_| async { ServerResponse::not_found("main") })),
    ])
    .unwrap()
}

/// (method, path, expected route name, first count, second count) after
/// running the table in order from fresh counters.
#[allow(dead_code)]
pub const PATHS: &[(&str, &str, &str, u32, u32)] = &[
    ("GET", "/", "get", 0, 0),
    ("GET", "/post", "post-get", 1, 1),
    ("POST", "/post", "post-post", 2, 2),
    ("PUT", "/post", "post-put", 3, 3),
    ("PUT", "/post/test", "post-test-put", 4, 4),
    ("DELETE", "/post", "post-delete", 5, 5),
    ("GET", "/user", "user-get", 6, 5),
    ("GET", "/user/test", "user-test-get", 7, 5),
    ("GET", "/user/before-global", "user-before-global-get", 8, 6),
    ("GET", "/user/2", "user-id-get", 9, 6),
    ("POST", "/user/2", "user-id-post", 10, 6),
    // Shadowed: `/user/:id` is declared before the group.
    ("GET", "/user/after-global", "user-id-get", 11, 6),
    ("DELETE", "/user/after-global", "user-after-global-delete", 12, 7),
    ("PUT", "/user/2/meh", "user-id-meh-put", 13, 7),
    ("PATCH", "/user/2", "user-id-patch", 14, 7),
    ("OPTIONS", "/user", "user-options", 15, 7),
];
