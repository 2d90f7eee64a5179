//! HTTP contracts and transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum, request id, trace, timeout layers)
//!     → request.rs (IncomingRequest: method, path, headers, body, context)
//!     → routing::Router (dispatch)
//!     → response.rs (ServerResponse → axum response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Context, IncomingRequest, ParamValue};
pub use response::ServerResponse;
pub use server::{HttpServer, ServerError};
