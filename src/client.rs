//! Outbound HTTP requests with transparent gzip decoding.
//!
//! Each [`OutboundRequest`] opens its own connection; idle connections are
//! not pooled. The whole response body is collected, gunzipped when the
//! origin says `content-encoding: gzip`, and handed back as text.

use std::io::Read;

use bytes::Bytes;
use flate2::read::GzDecoder;
use http::header::CONTENT_ENCODING;
use http::StatusCode;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{error, info};

use crate::config::authority;
use crate::error::Error;
use crate::method::Method;

/// A single request to `http://host:port/path`.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    host: String,
    port: u16,
    path: String,
    method: Method,
}

/// Status and decoded body of an outbound request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientResponse {
    pub status: StatusCode,
    pub body: String,
}

impl OutboundRequest {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>, method: Method) -> Self {
        Self { host: host.into(), port, path: path.into(), method }
    }

    pub fn get(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self::new(host, port, path, Method::Get)
    }

    pub fn uri(&self) -> String {
        format!("http://{}{}", authority(&self.host, self.port), self.path)
    }

    /// Issues the request and returns the fully read, decoded body.
    pub async fn fetch(&self) -> Result<ClientResponse, Error> {
        let req = http::Request::builder()
            .method(self.method.as_str())
            .uri(self.uri())
            .body(Empty::<Bytes>::new())?;

        let client: Client<HttpConnector, Empty<Bytes>> = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build_http();

        let res = client.request(req).await?;
        let status = res.status();
        info!(uri = %self.uri(), status = status.as_u16(), "response status");

        let gzipped = res.headers()
            .get(CONTENT_ENCODING)
            .is_some_and(|v| v.as_bytes() == b"gzip");
        let raw = res.into_body().collect().await?.to_bytes();

        let bytes = if gzipped { gunzip(&raw)? } else { raw.to_vec() };
        let body = String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))?;

        Ok(ClientResponse { status, body })
    }

    /// Callback flavour of [`fetch`](Self::fetch): `on_complete` gets the
    /// decoded body on success; on failure the error is logged and
    /// `on_complete` is never called.
    pub async fn send<F>(&self, on_complete: F)
    where
        F: FnOnce(String),
    {
        match self.fetch().await {
            Ok(res) => on_complete(res.body),
            Err(e) => error!(uri = %self.uri(), "request error occurred: {e}"),
        }
    }
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decode(format!("gzip: {e}")))?;
    Ok(out)
}
