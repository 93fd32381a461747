//! Engine Module
//!
//! Routes decoded commands to the typed store or the order book.
//!
//! ## Responsibilities
//! - Own the shared key space and the transaction layer over it
//! - Execute one command and shape its result as a `Payload`
//! - Wipe all state on server shutdown

use std::sync::Arc;

use crate::error::Result;
use crate::protocol::{Command, Payload};
use crate::store::TypedStore;
use crate::txn::OrderBook;

/// The command executor shared by every connection
///
/// ## Concurrency Model
///
/// - **Single-key commands**: atomic through the store's internal RwLock;
///   reads run concurrently, writes one at a time.
/// - **Compound commands** (submit/pay): serialized by the order book's lock
///   and hold the store's exclusive guard for their whole body.
///
/// Sequences of single-key commands across several keys are not atomic.
pub struct Engine {
    /// Shared key space
    store: Arc<TypedStore>,

    /// Compound operations over `store`
    orders: OrderBook,
}

impl Engine {
    /// Create an engine over an empty store
    pub fn new() -> Self {
        Self::with_store(Arc::new(TypedStore::new()))
    }

    /// Create an engine over an existing store
    pub fn with_store(store: Arc<TypedStore>) -> Self {
        let orders = OrderBook::new(Arc::clone(&store));
        Self { store, orders }
    }

    /// Create an engine whose payments settle to `token`
    pub fn with_settlement_account(token: impl Into<String>) -> Self {
        let store = Arc::new(TypedStore::new());
        let orders = OrderBook::with_settlement_account(Arc::clone(&store), token);
        Self { store, orders }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Payload> {
        let store = &self.store;
        let payload = match command {
            Command::Ping => Payload::Pong,

            Command::Get { key } => Payload::Reply(store.get(&key)?),
            Command::Put { key, value } => Payload::Reply(store.put(&key, &value)?),
            Command::Del { key } => Payload::Reply(store.del(&key)?),
            Command::Incr { key, delta } => Payload::Reply(store.incr(&key, delta)?),
            Command::CompareAndSet {
                key,
                base,
                set_value,
                cmp,
            } => Payload::Reply(store.compare_and_set(&key, base, set_value, cmp)?),
            Command::CompareAndIncr {
                key,
                base,
                delta,
                cmp,
            } => Payload::Reply(store.compare_and_incr(&key, base, delta, cmp)?),

            Command::HGet { key, field } => Payload::Reply(store.hget(&key, &field)?),
            Command::HSet { key, field, value } => {
                Payload::Reply(store.hset(&key, &field, &value)?)
            }
            Command::HIncr { key, field, delta } => {
                Payload::Reply(store.hincr(&key, &field, delta)?)
            }
            Command::HDel { key, field } => Payload::Reply(store.hdel(&key, &field)?),
            Command::HDelAll { key } => Payload::Reply(store.hdel_all(&key)?),
            Command::HGetAll { key } => Payload::Map(store.hget_all(&key)?),

            Command::SAdd { key, member } => Payload::Reply(store.sadd(&key, &member)?),
            Command::SIsMember { key, member } => {
                Payload::Reply(store.sis_member(&key, &member)?)
            }
            Command::SDel { key } => Payload::Reply(store.sdel(&key)?),

            Command::SubmitOrder {
                cart_id,
                user_token,
                cart_value,
            } => Payload::Status(self.orders.submit_order(&cart_id, &user_token, &cart_value)?),
            Command::PayOrder {
                order_id,
                user_token,
                amount,
            } => Payload::Status(self.orders.pay_order(&order_id, &user_token, amount)?),
            Command::QueryOrder { user_token } => Payload::Order(
                self.orders
                    .query_order(&user_token)?
                    .map(|order| order.to_string()),
            ),
        };
        Ok(payload)
    }

    /// Drop all data
    pub fn wipe(&self) {
        self.store.wipe();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The shared key space
    pub fn store(&self) -> &Arc<TypedStore> {
        &self.store
    }

    /// The transaction layer
    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        self.store.len()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
