//! Demo server: `public/` on localhost:9090 plus a JSON endpoint.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:9090/
//!   curl http://localhost:9090/request

use std::path::PathBuf;

use clap::Parser;
use lightserve::{Method, Request, Response, Router, Server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Serve a directory and a few JSON routes over HTTP")]
struct Args {
    /// Host name or address to bind
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 9090)]
    port: u16,

    /// Directory served for any path without a route
    #[arg(short, long, default_value = "public")]
    root: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), lightserve::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let app = Router::new().on(Method::Get, "/request", random_number);

    Server::new(ServerConfig::new(args.host, args.port, args.root))
        .serve(app)
        .await
}

// GET /request → {"key":"random number","value":0.42…}
async fn random_number(_req: Request) -> Response {
    let data = serde_json::json!({
        "key": "random number",
        "value": fastrand::f64(),
    });
    Response::json(data.to_string())
}
