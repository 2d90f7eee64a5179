//! Demo server for the routing core.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌─────────┐    ┌──────────────┐    ┌───────────────┐
//!     ───────────────────▶│  http   │───▶│   routing    │───▶│   handler     │
//!                         │ server  │    │ flat table   │    │ (+middleware) │
//!     Client Response     │ (axum)  │◀───│ match / 404  │◀───│               │
//!     ◀───────────────────└─────────┘    └──────────────┘    └───────────────┘
//!
//!                         config · logging · metrics
//! ```
//!
//! `assemble serve` (default) serves the demo application;
//! `assemble routes` prints its diagnostic route table as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use assemble::config::{load_config, ServerConfig};
use assemble::http::server::shutdown_signal;
use assemble::http::{HttpServer, IncomingRequest, ServerResponse};
use assemble::observability::{logging, metrics};
use assemble::routing::{
    context, delete, get, handler_fn, not_found, post, put, Middleware, Next, RouteResult, Router,
};

#[derive(Parser)]
#[command(name = "assemble")]
#[command(about = "Demo server for the assemble routing core", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo application (default)
    Serve,
    /// Print the demo route table as JSON and exit
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    let router = demo_routes()?;

    if let Some(Commands::Routes) = cli.command {
        println!("{}", router.route_table().to_json()?);
        return Ok(());
    }

    tracing::info!("assemble v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = router.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, Arc::new(router));
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Echo the matched route name, the URL and the routing context.
fn echo(name: &'static str) -> assemble::routing::BoxedHandler {
    handler_fn(move |req: IncomingRequest| async move {
        ServerResponse::json(&serde_json::json!({
            "url": req.path,
            "path": name,
            "ctx": req.context,
        }))
    })
}

fn timing() -> Middleware {
    Middleware::from_fn("timing", |req: IncomingRequest, next: Next| async move {
        let start = Instant::now();
        let path = req.path.clone();
        let res = next.run(req).await;
        tracing::info!(path = %path, status = res.status_code, elapsed = ?start.elapsed(), "Handled");
        res
    })
}

fn require_json() -> Middleware {
    Middleware::from_fn("require_json", |req: IncomingRequest, next: Next| async move {
        let is_json = req
            .header("content-type")
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);
        if req.method.eq_ignore_ascii_case("GET") || req.body.is_empty() || is_json {
            next.run(req).await
        } else {
            ServerResponse::new(415, "expected application/json")
        }
    })
}

fn demo_routes() -> RouteResult<Router> {
    Router::new(vec![
        get("/", echo("get")),
        context(
            "/post",
            [timing(), require_json()],
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
            [timing()],
            vec![
                get("/", echo("user-get")),
                get("/test", echo("user-test-get")),
                get("/:id", echo("user-id-get")),
                post("/:id", echo("user-id-post")),
                put("/:id/meh", echo("user-id-meh-put")),
            ],
        ),
        not_found(handler_fn(|_| async { ServerResponse::not_found("main") })),
    ])
}
