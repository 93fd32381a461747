//! Connection pool
//!
//! A fixed set of pre-dialed connections shared by many callers.
//!
//! ## Slot Lifecycle
//! ```text
//!   idle queue ──acquire──▶ PooledConnection ──drop──▶ idle queue
//!                               │
//!                     connection error: slot emptied,
//!                     re-dialed by the next acquirer
//! ```
//!
//! The number of slots never changes, so at most `size` connections to the
//! server exist at any time.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use super::connection::{log_dial_error, ClientConnection};
use super::standalone::millis;
use super::RemoteCall;
use crate::config::Config;
use crate::error::{Result, RushError};
use crate::protocol::{Command, Payload};

/// One pool slot; `conn` is `None` until (re)dialed
struct Slot {
    id: usize,
    conn: Option<ClientConnection>,
}

/// Bounded pool of client connections
pub struct ConnectionPool {
    addr: String,
    size: usize,
    dial_timeout: Option<Duration>,
    call_timeout: Option<Duration>,

    /// Free slots
    idle: Receiver<Slot>,

    /// Return path for released slots
    release: Sender<Slot>,
}

impl ConnectionPool {
    /// Create a pool of `size` connections to `addr` with default timeouts
    pub fn connect(addr: impl Into<String>, size: usize) -> Result<Self> {
        let config = Config::builder().pool_size(size).build()?;
        Self::with_config(addr, &config)
    }

    /// Create a pool sized and timed by `config`
    ///
    /// Every slot is dialed up front. A slot whose dial fails starts empty
    /// and is dialed again on first use.
    pub fn with_config(addr: impl Into<String>, config: &Config) -> Result<Self> {
        let size = config.pool_size;
        if size == 0 {
            return Err(RushError::Config("pool size must be at least 1".to_string()));
        }

        let (release, idle) = channel::bounded(size);
        let pool = Self {
            addr: addr.into(),
            size,
            dial_timeout: millis(config.dial_timeout_ms),
            call_timeout: millis(config.call_timeout_ms),
            idle,
            release,
        };

        let mut dialed = 0;
        for id in 0..size {
            let conn = pool.dial().ok();
            if conn.is_some() {
                dialed += 1;
            }
            pool.release
                .send(Slot { id, conn })
                .map_err(|_| RushError::Network("pool queue closed".to_string()))?;
        }

        tracing::debug!("Pool to {}: {}/{} slots dialed", pool.addr, dialed, size);
        Ok(pool)
    }

    /// Borrow a connection, blocking until one is free
    pub fn acquire(&self) -> Result<PooledConnection<'_>> {
        let slot = self
            .idle
            .recv()
            .map_err(|_| RushError::Network("pool queue closed".to_string()))?;
        Ok(PooledConnection {
            pool: self,
            slot: Some(slot),
        })
    }

    /// Borrow a connection, giving up after `timeout`
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<PooledConnection<'_>> {
        match self.idle.recv_timeout(timeout) {
            Ok(slot) => Ok(PooledConnection {
                pool: self,
                slot: Some(slot),
            }),
            Err(RecvTimeoutError::Timeout) => Err(RushError::PoolTimeout),
            Err(RecvTimeoutError::Disconnected) => {
                Err(RushError::Network("pool queue closed".to_string()))
            }
        }
    }

    /// Total number of slots
    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots currently free
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn dial(&self) -> Result<ClientConnection> {
        ClientConnection::dial(&self.addr, self.dial_timeout, self.call_timeout).map_err(|e| {
            log_dial_error(&self.addr, &e);
            e
        })
    }
}

impl RemoteCall for ConnectionPool {
    fn call(&self, command: Command) -> Result<Payload> {
        self.acquire()?.call(&command)
    }
}

/// A borrowed slot, returned to the pool on drop
pub struct PooledConnection<'a> {
    pool: &'a ConnectionPool,
    slot: Option<Slot>,
}

impl PooledConnection<'_> {
    /// Issue one call on this slot
    ///
    /// Dials first if the slot is empty. Any failure other than a
    /// server-reported error empties the slot so the next user re-dials.
    pub fn call(&mut self, command: &Command) -> Result<Payload> {
        let slot = self
            .slot
            .as_mut()
            .ok_or_else(|| RushError::Network("slot already released".to_string()))?;

        if slot.conn.is_none() {
            tracing::debug!("Re-dialing pool slot {} to {}", slot.id, self.pool.addr);
            slot.conn = Some(self.pool.dial()?);
        }

        let result = match slot.conn.as_mut() {
            Some(conn) => conn.round_trip(command),
            None => Err(RushError::Network("slot has no connection".to_string())),
        };

        if let Err(ref e) = result {
            if !matches!(e, RushError::Remote(_)) {
                tracing::debug!(
                    "Pool slot {} invalidated after {:?}: {}",
                    slot.id,
                    command.command_type(),
                    e
                );
                slot.conn = None;
            }
        }
        result
    }

    /// Whether this slot currently holds a live connection
    pub fn is_connected(&self) -> bool {
        self.slot.as_ref().is_some_and(|slot| slot.conn.is_some())
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            // Cannot fail: the pool holds the receiver and outlives this guard
            let _ = self.pool.release.send(slot);
        }
    }
}
