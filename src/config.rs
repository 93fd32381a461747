//! Configuration for rushkv
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a rushkv server or client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// How often the acceptor re-checks the lifecycle while idle (milliseconds)
    pub accept_poll_ms: u64,

    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// Number of pre-dialed connections held by a pool
    pub pool_size: usize,

    /// Dial timeout (milliseconds, 0 = OS default)
    pub dial_timeout_ms: u64,

    /// Per-call I/O timeout on client connections (milliseconds, 0 = none)
    pub call_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            accept_poll_ms: 10,
            pool_size: 100,
            dial_timeout_ms: 1000,
            call_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the acceptor poll interval (in milliseconds)
    pub fn accept_poll_ms(mut self, ms: u64) -> Self {
        self.config.accept_poll_ms = ms;
        self
    }

    /// Set the number of pooled connections
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Set the dial timeout (in milliseconds)
    pub fn dial_timeout_ms(mut self, ms: u64) -> Self {
        self.config.dial_timeout_ms = ms;
        self
    }

    /// Set the client call timeout (in milliseconds)
    pub fn call_timeout_ms(mut self, ms: u64) -> Self {
        self.config.call_timeout_ms = ms;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> crate::Result<Config> {
        if self.config.max_connections == 0 {
            return Err(crate::RushError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.config.pool_size == 0 {
            return Err(crate::RushError::Config(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if self.config.accept_poll_ms == 0 {
            return Err(crate::RushError::Config(
                "accept_poll_ms must be at least 1".to_string(),
            ));
        }
        Ok(self.config)
    }
}
