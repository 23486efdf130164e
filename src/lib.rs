//! # lightserve
//!
//! A minimal HTTP server: a directory of static files, plus a handful of
//! routes answered by your own handlers.
//!
//! Every request goes through the same two steps:
//!
//! 1. **Route table.** Routes are checked in registration order; the first one
//!    whose method and path equal the request's exactly gets the request, and
//!    its handler alone decides the response.
//! 2. **Static root.** Anything else is looked up under the static root.
//!    Directories answer with their `index.html`. The content type comes from
//!    the file extension via a [`ContentTypeTable`].
//!
//! Static failures are plain-text responses: a missing file is `400`, an
//! unreadable file or an extension with no known content type is `500`.
//!
//! [`OutboundRequest`] is the companion client: one request, body collected
//! and gunzipped when the origin compressed it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lightserve::{Method, Request, Response, Router, Server, ServerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let app = Router::new().on(Method::Get, "/hello", hello);
//!
//!     Server::new(ServerConfig::new("localhost", 9090, "public"))
//!         .serve(app)
//!         .await
//!         .unwrap();
//! }
//!
//! async fn hello(req: Request) -> Response {
//!     Response::text(format!("hello from {}", req.path()))
//! }
//! ```
//!
//! ## Logging
//!
//! Everything is reported through [`tracing`]: one `info` event per request
//! with its method and path, a startup event describing the host, and
//! `warn`/`error` events for failures. Install whichever subscriber you like;
//! lightserve never installs one itself.

mod client;
mod config;
mod content_type;
mod dispatch;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod static_files;

pub use client::{ClientResponse, OutboundRequest};
pub use config::ServerConfig;
pub use content_type::ContentTypeTable;
pub use dispatch::Dispatcher;
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use http::StatusCode;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Route, Router};
pub use server::Server;
pub use static_files::{ResolvedFile, ServeError, StaticFiles, INDEX_FILE};
