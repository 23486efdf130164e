//! Per-request dispatch: route table first, static files second.

use http::StatusCode;
use tracing::{error, info};

use crate::handler::BoxedHandler;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::static_files::StaticFiles;

/// Sends each request either to its route's handler or to the file resolver.
///
/// Shared read-only by every connection once the server has started.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    router: Router,
    files: StaticFiles,
}

impl Dispatcher {
    pub fn new(router: Router, files: StaticFiles) -> Self {
        Self { router, files }
    }

    pub fn router(&self) -> &Router { &self.router }
    pub fn files(&self) -> &StaticFiles { &self.files }

    /// Produces the response for one request.
    ///
    /// A matched handler has sole say over the response; the file resolver
    /// is not consulted at all.
    pub async fn dispatch(&self, req: Request) -> Response {
        info!(method = %req.method(), path = %req.path(), "request");

        match self.router.lookup(req.method(), req.path()) {
            Some(route) => run_handler(route.handler().clone(), req).await,
            None => self.files.serve(req.path()).await,
        }
    }
}

/// Runs a handler on its own task, so a panic inside it becomes a 500 for
/// this request instead of a dropped connection.
async fn run_handler(handler: BoxedHandler, req: Request) -> Response {
    let method = req.method().to_owned();
    let path = req.path().to_owned();

    match tokio::spawn(handler.call(req)).await {
        Ok(response) => response,
        Err(e) => {
            error!(%method, %path, "route handler failed: {e}");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .text("internal server error")
        }
    }
}
