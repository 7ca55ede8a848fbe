use std::path::PathBuf;
use std::time::Duration;

/// Runtime options for the relay server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host the listener binds to.
    pub host: String,
    /// Port the listener binds to; `0` picks a free port.
    pub port: u16,
    /// Readiness file written after a successful bind, removed on stop.
    /// Disabled when `None`.
    pub ready_file: Option<PathBuf>,
    /// Frames held between ingestion and detection; older frames are
    /// evicted beyond this.
    pub buffer_capacity: usize,
    /// Back-off of the detection loop when the buffer is empty.
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            ready_file: None,
            buffer_capacity: 5,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Defaults overridden by the `QR_RELAY_HOST`, `QR_RELAY_PORT` and
    /// `QR_RELAY_READY_FILE` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("QR_RELAY_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("QR_RELAY_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => log::warn!("ignoring invalid QR_RELAY_PORT value: {port}"),
            }
        }
        if let Ok(path) = std::env::var("QR_RELAY_READY_FILE") {
            config.ready_file = Some(PathBuf::from(path));
        }
        config
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_ready_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ready_file = Some(path.into());
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// `host:port` string for binding and logging.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
