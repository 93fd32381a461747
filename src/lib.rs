//! # rushkv
//!
//! An in-memory typed key-value store reachable over TCP, with:
//! - Scalar, field-map and set value families
//! - Thread-per-connection server with a one-way lifecycle
//! - Pooled and dial-per-call clients
//! - Atomic order submission and payment over the shared key space
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │   ConnectionPool     │      │   Client (per call)  │
//! └──────────┬───────────┘      └──────────┬───────────┘
//!            └──────────────┬──────────────┘
//!                           │ framed bincode over TCP
//! ┌─────────────────────────▼───────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one worker per connection)                     │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────────────┐
//! │                        Engine                                │
//! │                   (command router)                           │
//! └─────────────┬──────────────────────────────┬────────────────┘
//!               │                              │
//!               ▼                              ▼
//!   ┌──────────────────────┐       ┌──────────────────────┐
//!   │      OrderBook       │──────▶│     TypedStore       │
//!   │ (RwLock, compound)   │       │ (RwLock, per call)   │
//!   └──────────────────────┘       └──────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod txn;
pub mod protocol;
pub mod engine;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RushError, Result};
pub use config::Config;
pub use engine::Engine;
pub use store::{CompareOp, MapReply, Reply, TypedStore};
pub use txn::{OrderBook, TxnStatus};
pub use network::Server;
pub use client::{Client, ConnectionPool, RemoteCall};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rushkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
