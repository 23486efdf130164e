//! HTTP server and graceful shutdown.
//!
//! The server owns its [`ServerConfig`] and [`ContentTypeTable`]. On
//! [`Server::serve`] it binds, logs where it is running and on what machine,
//! and hands every request to a shared [`Dispatcher`].
//!
//! Shutdown:
//! 1. SIGTERM or Ctrl-C stops `listener.accept()`; no new connections.
//! 2. Every in-flight connection task runs to completion.
//! 3. [`Server::serve`] returns.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::{authority, ServerConfig};
use crate::content_type::ContentTypeTable;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::static_files::StaticFiles;

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    content_types: ContentTypeTable,
}

impl Server {
    /// A server for `config` with the default content-type table.
    ///
    /// ```rust,no_run
    /// use lightserve::{Router, Server, ServerConfig};
    ///
    /// # async fn run() -> Result<(), lightserve::Error> {
    /// Server::new(ServerConfig::new("localhost", 9090, "public"))
    ///     .serve(Router::new())
    ///     .await
    /// # }
    /// ```
    pub fn new(config: ServerConfig) -> Self {
        Self { config, content_types: ContentTypeTable::default() }
    }

    /// Replaces the content-type table. Only possible before serving.
    pub fn with_content_types(mut self, content_types: ContentTypeTable) -> Self {
        self.content_types = content_types;
        self
    }

    pub fn config(&self) -> &ServerConfig { &self.config }

    /// Binds `host:port` and serves until SIGTERM or Ctrl-C, then drains
    /// in-flight connections.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve_with_shutdown(listener, router, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `signal` resolves.
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let local_addr = listener.local_addr()?;
        log_server_info(self.config.host(), local_addr.port());

        let files = StaticFiles::new(self.config.static_root(), self.content_types);
        let dispatcher = Arc::new(Dispatcher::new(router, files));

        // JoinSet tracks every spawned connection task so we can wait for
        // them all to finish during graceful shutdown.
        let mut tasks = tokio::task::JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so it wins over a queue of pending accepts.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let dispatcher = Arc::clone(&dispatcher);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let dispatcher = Arc::clone(&dispatcher);
                            async move { handle(dispatcher, req).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("server stopped");
        Ok(())
    }
}

/// hyper entry point. Every failure is turned into a response here, so hyper
/// never sees an error.
async fn handle(
    dispatcher: Arc<Dispatcher>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let response = match Request::from_hyper(req).await {
        Ok(req) => dispatcher.dispatch(req).await,
        Err(e) => {
            warn!("failed to read request body: {e}");
            Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .text("failed to read request body")
        }
    };

    Ok(response.into_inner())
}

/// One-time startup banner: where we listen and what we run on.
fn log_server_info(host: &str, port: u16) {
    info!(
        url = %format!("http://{}/", authority(host, port)),
        arch = std::env::consts::ARCH,
        cores = num_cpus::get(),
        physical_cores = num_cpus::get_physical(),
        os = std::env::consts::OS,
        family = std::env::consts::FAMILY,
        "server running"
    );
}

/// Resolves on the first shutdown signal the process receives.
///
/// SIGTERM and SIGINT on Unix; Ctrl-C only elsewhere. If a handler cannot be
/// installed that arm never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
