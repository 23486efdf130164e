//! Server configuration.

use std::path::{Path, PathBuf};

/// Where the server listens and which directory it serves.
///
/// Set once when the [`Server`](crate::Server) is built; read-only after that.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    static_root: PathBuf,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, static_root: impl Into<PathBuf>) -> Self {
        Self { host: host.into(), port, static_root: static_root.into() }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_static_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.static_root = root.into();
        self
    }

    pub fn host(&self) -> &str { &self.host }
    pub fn port(&self) -> u16 { self.port }
    pub fn static_root(&self) -> &Path { &self.static_root }

    /// `host:port`, suitable for [`tokio::net::TcpListener::bind`].
    ///
    /// Host names such as `localhost` are resolved at bind time, so this is a
    /// string rather than a `SocketAddr`. IPv6 literals are bracketed.
    pub fn bind_addr(&self) -> String {
        authority(&self.host, self.port)
    }
}

/// `host:port`, with `[...]` around a bare IPv6 host.
pub(crate) fn authority(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("localhost", 9090, "public")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_localhost_9090() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "localhost:9090");
        assert_eq!(config.static_root(), Path::new("public"));
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        assert_eq!(ServerConfig::default().with_host("::1").bind_addr(), "[::1]:9090");
        assert_eq!(ServerConfig::default().with_host("[::1]").bind_addr(), "[::1]:9090");
        assert_eq!(ServerConfig::default().with_host("127.0.0.1").bind_addr(), "127.0.0.1:9090");
        let addr: std::net::SocketAddr = ServerConfig::default()
            .with_host("::1")
            .bind_addr()
            .parse()
            .expect("valid socket address");
        assert!(addr.is_ipv6());
    }

    #[test]
    fn setters_replace_fields() {
        let config = ServerConfig::default()
            .with_host("127.0.0.1")
            .with_port(0)
            .with_static_root("/srv/www");
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 0);
        assert_eq!(config.static_root(), Path::new("/srv/www"));
    }
}
