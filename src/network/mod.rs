//! Network Module
//!
//! TCP server and connection handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking listener, lifecycle polling)
//! - One worker thread per connection, calls handled in order
//! - Commands routed through Engine

mod server;
mod connection;
mod lifecycle;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use lifecycle::{Lifecycle, State};
