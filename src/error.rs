//! Unified error type.

use std::fmt;

/// The error type returned by lightserve's fallible operations.
///
/// Per-request failures while serving (missing file, unreadable file, unknown
/// extension) are expressed as HTTP [`Response`](crate::Response) values via
/// [`ServeError`](crate::ServeError), not as `Error`s. This type surfaces
/// infrastructure failures: binding a port, and the outbound client's
/// transport and decoding problems.
#[derive(Debug)]
pub enum Error {
    /// Binding, accepting, or any other socket-level failure.
    Io(std::io::Error),
    /// The outbound request could not be built from host, port and path.
    Request(http::Error),
    /// The outbound request failed in transit.
    Transport(hyper_util::client::legacy::Error),
    /// The outbound response body could not be read.
    Body(hyper::Error),
    /// The outbound response body was not valid gzip or not valid UTF-8.
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)        => write!(f, "io: {e}"),
            Self::Request(e)   => write!(f, "invalid request: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Body(e)      => write!(f, "response body: {e}"),
            Self::Decode(msg)  => write!(f, "decode: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)        => Some(e),
            Self::Request(e)   => Some(e),
            Self::Transport(e) => Some(e),
            Self::Body(e)      => Some(e),
            Self::Decode(_)    => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Self::Request(e)
    }
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Self::Body(e)
    }
}
