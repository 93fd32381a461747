//! Standalone client
//!
//! Dials once per call and closes afterwards. Meant for low-volume and test
//! use; hot paths go through `ConnectionPool`.

use std::time::Duration;

use super::connection::{log_dial_error, ClientConnection};
use super::RemoteCall;
use crate::config::Config;
use crate::error::{Result, RushError};
use crate::protocol::{Command, Payload};

/// Dial-per-call client
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    dial_timeout: Option<Duration>,
    call_timeout: Option<Duration>,
}

impl Client {
    /// Create a client for `addr` with default timeouts
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(addr, &Config::default())
    }

    /// Create a client for `addr` using the timeouts in `config`
    pub fn with_config(addr: impl Into<String>, config: &Config) -> Self {
        Self {
            addr: addr.into(),
            dial_timeout: millis(config.dial_timeout_ms),
            call_timeout: millis(config.call_timeout_ms),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl RemoteCall for Client {
    fn call(&self, command: Command) -> Result<Payload> {
        let mut conn = ClientConnection::dial(&self.addr, self.dial_timeout, self.call_timeout)
            .map_err(|e| {
                log_dial_error(&self.addr, &e);
                e
            })?;

        let op = command.command_type();
        conn.round_trip(&command).map_err(|e| {
            if !matches!(e, RushError::Remote(_)) {
                tracing::warn!("{:?} to {} failed: {}", op, self.addr, e);
            }
            e
        })
        // Connection closes on drop
    }
}

pub(crate) fn millis(ms: u64) -> Option<Duration> {
    if ms == 0 {
        None
    } else {
        Some(Duration::from_millis(ms))
    }
}
