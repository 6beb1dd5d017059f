//! Server configuration.

use std::env;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
/// Size of the fixed request buffer. Headers and body that do not fit are
/// cut off at this many bytes.
pub const DEFAULT_REQUEST_BUFFER: usize = 64 * 1024;

pub const ENV_HOST: &str = "SNASK_HOST";
pub const ENV_PORT: &str = "SNASK_PORT";
pub const ENV_MAX_REQUESTS: &str = "SNASK_MAX_REQUESTS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_bytes: usize,
    /// Stop after this many connections. `None` serves forever.
    pub max_requests: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_request_bytes: DEFAULT_REQUEST_BUFFER,
            max_requests: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `SNASK_HOST`, `SNASK_PORT` and
    /// `SNASK_MAX_REQUESTS`. Unparseable values are ignored; a
    /// `SNASK_MAX_REQUESTS` of 0 means unlimited.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = env::var(ENV_HOST) {
            if !host.is_empty() {
                config.host = host;
            }
        }
        if let Some(port) = env::var(ENV_PORT).ok().and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Some(n) = env::var(ENV_MAX_REQUESTS)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            config.max_requests = (n > 0).then_some(n);
        }
        config
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_max_requests(mut self, n: Option<usize>) -> Self {
        self.max_requests = n.filter(|&n| n > 0);
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
