//! TCP Server
//!
//! Accepts connections and serves each one on its own thread.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::connection::Connection;
use super::lifecycle::{Lifecycle, State};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{Result, RushError};

/// TCP server for rushkv
///
/// ## Threads
/// - One acceptor thread polling a non-blocking listener
/// - One worker thread per accepted connection
///
/// Dropping the server kills it.
pub struct Server {
    config: Config,

    /// Shared command executor
    engine: Arc<Engine>,

    /// Running/stopped flag shared with every thread
    lifecycle: Arc<Lifecycle>,

    /// Live connections, shut down on kill
    connections: Arc<Registry>,

    /// Bound address, known once serving
    local_addr: Option<SocketAddr>,

    /// Acceptor thread (owns the listener)
    acceptor: Option<JoinHandle<()>>,
}

impl Server {
    /// Create a new server with the given config and engine
    pub fn new(config: Config, engine: Arc<Engine>) -> Self {
        let connections = Arc::new(Registry::new(config.max_connections));
        Self {
            config,
            engine,
            lifecycle: Arc::new(Lifecycle::new()),
            connections,
            local_addr: None,
            acceptor: None,
        }
    }

    /// Bind and start accepting in the background
    ///
    /// Returns the bound address (useful with port 0). Fails if the address
    /// cannot be bound or the server was already started.
    pub fn serve(&mut self) -> Result<SocketAddr> {
        if self.lifecycle.state() != State::Idle {
            return Err(RushError::ServerStopped);
        }

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            RushError::Network(format!("failed to bind {}: {}", self.config.listen_addr, e))
        })?;
        // Non-blocking so the acceptor can observe shutdown
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        if !self.lifecycle.start() {
            return Err(RushError::ServerStopped);
        }

        let acceptor = Acceptor {
            listener,
            engine: Arc::clone(&self.engine),
            lifecycle: Arc::clone(&self.lifecycle),
            connections: Arc::clone(&self.connections),
            poll: Duration::from_millis(self.config.accept_poll_ms),
            read_timeout_ms: self.config.read_timeout_ms,
            write_timeout_ms: self.config.write_timeout_ms,
        };
        let handle = thread::Builder::new()
            .name("rushkv-acceptor".to_string())
            .spawn(move || acceptor.run())?;

        tracing::info!("Serving on {}", local_addr);
        self.local_addr = Some(local_addr);
        self.acceptor = Some(handle);
        Ok(local_addr)
    }

    /// Start the server and block until it stops
    pub fn run(&mut self) -> Result<()> {
        self.serve()?;
        if let Some(handle) = self.acceptor.take() {
            if handle.join().is_err() {
                tracing::error!("Acceptor thread panicked");
            }
        }
        self.kill();
        Ok(())
    }

    /// Signal the acceptor to stop without tearing anything down
    pub fn shutdown(&self) {
        self.shutdown_handle().shutdown();
    }

    /// Stop accepting, close the listener, drop live connections, wipe data
    ///
    /// Meant for test teardown rather than a graceful drain. Idempotent.
    pub fn kill(&mut self) {
        let first = self.lifecycle.stop();

        if let Some(handle) = self.acceptor.take() {
            if handle.join().is_err() {
                tracing::error!("Acceptor thread panicked");
            }
        }

        let dropped = self.connections.shutdown_all();
        self.engine.wipe();

        if first {
            tracing::info!("Server killed ({} live connections dropped)", dropped);
        }
    }

    /// Handle that stops the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }

    /// Address the server is bound to, once serving
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    /// Number of connections currently being served
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Stops a server blocked in [`Server::run`]
#[derive(Clone)]
pub struct ShutdownHandle {
    lifecycle: Arc<Lifecycle>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if self.lifecycle.stop() {
            tracing::info!("Shutdown requested");
        }
    }
}

// =============================================================================
// Acceptor
// =============================================================================

struct Acceptor {
    listener: TcpListener,
    engine: Arc<Engine>,
    lifecycle: Arc<Lifecycle>,
    connections: Arc<Registry>,
    poll: Duration,
    read_timeout_ms: u64,
    write_timeout_ms: u64,
}

impl Acceptor {
    /// Accept until the lifecycle leaves `Running`; the listener closes on return
    fn run(self) {
        while self.lifecycle.is_running() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if !self.lifecycle.is_running() {
                        drop(stream);
                        break;
                    }
                    if let Err(e) = self.dispatch(stream, peer) {
                        tracing::warn!("Failed to start worker for {}: {}", peer, e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(self.poll),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(self.poll);
                }
            }
        }
        tracing::debug!("Acceptor stopped, closing listener");
    }

    /// Serve one connection on a fresh worker thread
    fn dispatch(&self, stream: TcpStream, peer: SocketAddr) -> Result<()> {
        stream.set_nonblocking(false)?;

        let ticket = match self.connections.register(&stream)? {
            Some(ticket) => ticket,
            None => {
                tracing::warn!(
                    "Rejecting {}: {} connections already open",
                    peer,
                    self.connections.len()
                );
                let _ = stream.shutdown(Shutdown::Both);
                return Ok(());
            }
        };

        let engine = Arc::clone(&self.engine);
        let lifecycle = Arc::clone(&self.lifecycle);
        let (read_ms, write_ms) = (self.read_timeout_ms, self.write_timeout_ms);

        thread::Builder::new()
            .name(format!("rushkv-conn-{}", ticket.id))
            .spawn(move || {
                let _ticket = ticket;
                let result = Connection::new(stream, engine, lifecycle).and_then(|mut conn| {
                    conn.set_timeouts(read_ms, write_ms)?;
                    conn.handle()
                });
                if let Err(e) = result {
                    tracing::debug!("Connection from {} ended with error: {}", peer, e);
                }
            })?;
        Ok(())
    }
}

// =============================================================================
// Connection Registry
// =============================================================================

/// Live connection streams keyed by id
struct Registry {
    streams: Mutex<HashMap<u64, TcpStream>>,
    next_id: AtomicU64,
    limit: usize,
}

impl Registry {
    fn new(limit: usize) -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            limit,
        }
    }

    /// Track a stream; `None` when the connection limit is reached
    fn register(self: &Arc<Self>, stream: &TcpStream) -> Result<Option<Ticket>> {
        let mut streams = self.streams.lock();
        if streams.len() >= self.limit {
            return Ok(None);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        streams.insert(id, stream.try_clone()?);
        Ok(Some(Ticket {
            id,
            registry: Arc::clone(self),
        }))
    }

    fn len(&self) -> usize {
        self.streams.lock().len()
    }

    /// Shut down every tracked stream, returning how many there were
    fn shutdown_all(&self) -> usize {
        let streams: Vec<TcpStream> = self.streams.lock().drain().map(|(_, s)| s).collect();
        for stream in &streams {
            let _ = stream.shutdown(Shutdown::Both);
        }
        streams.len()
    }
}

/// Removes its connection from the registry when the worker exits
struct Ticket {
    id: u64,
    registry: Arc<Registry>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.registry.streams.lock().remove(&self.id);
    }
}
