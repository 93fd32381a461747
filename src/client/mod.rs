//! Client Module
//!
//! Typed remote calls over a dial-per-call client or a connection pool.
//!
//! ## Call Contract
//! Every call returns `Result`:
//! - `Err(..)`: the call did not succeed (transport failure, or the server
//!   rejected the call). `RushError::is_connection_error` tells which.
//! - `Ok(reply)`: the call succeeded; `reply.flag` / `TxnStatus` carry the
//!   domain answer (existed, applied, out of stock, ...).

mod standalone;
mod connection;
mod pool;

pub use standalone::Client;
pub use connection::{is_quiet_dial_error, ClientConnection};
pub use pool::{ConnectionPool, PooledConnection};

use crate::error::{Result, RushError};
use crate::protocol::{Command, Payload};
use crate::store::{CompareOp, MapReply, Reply};
use crate::txn::{Order, TxnStatus};

/// The remote procedure surface
///
/// Implementors supply `call`; every typed operation is built on it.
pub trait RemoteCall {
    /// Issue one command and return its payload
    fn call(&self, command: Command) -> Result<Payload>;

    fn ping(&self) -> Result<()> {
        match self.call(Command::Ping)? {
            Payload::Pong => Ok(()),
            other => Err(unexpected("PING", &other)),
        }
    }

    // -------------------------------------------------------------------------
    // Scalar
    // -------------------------------------------------------------------------

    fn get(&self, key: &str) -> Result<Reply> {
        expect_reply(self.call(Command::Get { key: key.into() })?)
    }

    fn put(&self, key: &str, value: &str) -> Result<Reply> {
        expect_reply(self.call(Command::Put {
            key: key.into(),
            value: value.into(),
        })?)
    }

    fn del(&self, key: &str) -> Result<Reply> {
        expect_reply(self.call(Command::Del { key: key.into() })?)
    }

    fn incr(&self, key: &str, delta: i64) -> Result<Reply> {
        expect_reply(self.call(Command::Incr {
            key: key.into(),
            delta,
        })?)
    }

    fn compare_and_set(&self, key: &str, base: i64, set_value: i64, cmp: CompareOp) -> Result<Reply> {
        expect_reply(self.call(Command::CompareAndSet {
            key: key.into(),
            base,
            set_value,
            cmp,
        })?)
    }

    fn compare_and_incr(&self, key: &str, base: i64, delta: i64, cmp: CompareOp) -> Result<Reply> {
        expect_reply(self.call(Command::CompareAndIncr {
            key: key.into(),
            base,
            delta,
            cmp,
        })?)
    }

    // -------------------------------------------------------------------------
    // Field-map
    // -------------------------------------------------------------------------

    fn hget(&self, key: &str, field: &str) -> Result<Reply> {
        expect_reply(self.call(Command::HGet {
            key: key.into(),
            field: field.into(),
        })?)
    }

    fn hset(&self, key: &str, field: &str, value: &str) -> Result<Reply> {
        expect_reply(self.call(Command::HSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        })?)
    }

    fn hincr(&self, key: &str, field: &str, delta: i64) -> Result<Reply> {
        expect_reply(self.call(Command::HIncr {
            key: key.into(),
            field: field.into(),
            delta,
        })?)
    }

    fn hdel(&self, key: &str, field: &str) -> Result<Reply> {
        expect_reply(self.call(Command::HDel {
            key: key.into(),
            field: field.into(),
        })?)
    }

    fn hdel_all(&self, key: &str) -> Result<Reply> {
        expect_reply(self.call(Command::HDelAll { key: key.into() })?)
    }

    fn hget_all(&self, key: &str) -> Result<MapReply> {
        match self.call(Command::HGetAll { key: key.into() })? {
            Payload::Map(reply) => Ok(reply),
            other => Err(unexpected("HGETALL", &other)),
        }
    }

    // -------------------------------------------------------------------------
    // Set
    // -------------------------------------------------------------------------

    fn sadd(&self, key: &str, member: &str) -> Result<Reply> {
        expect_reply(self.call(Command::SAdd {
            key: key.into(),
            member: member.into(),
        })?)
    }

    fn sis_member(&self, key: &str, member: &str) -> Result<Reply> {
        expect_reply(self.call(Command::SIsMember {
            key: key.into(),
            member: member.into(),
        })?)
    }

    fn sdel(&self, key: &str) -> Result<Reply> {
        expect_reply(self.call(Command::SDel { key: key.into() })?)
    }

    // -------------------------------------------------------------------------
    // Compound
    // -------------------------------------------------------------------------

    fn submit_order(&self, cart_id: &str, user_token: &str, cart_value: &str) -> Result<TxnStatus> {
        expect_status(self.call(Command::SubmitOrder {
            cart_id: cart_id.into(),
            user_token: user_token.into(),
            cart_value: cart_value.into(),
        })?)
    }

    fn pay_order(&self, order_id: &str, user_token: &str, amount: i64) -> Result<TxnStatus> {
        expect_status(self.call(Command::PayOrder {
            order_id: order_id.into(),
            user_token: user_token.into(),
            amount,
        })?)
    }

    fn query_order(&self, user_token: &str) -> Result<Option<Order>> {
        match self.call(Command::QueryOrder {
            user_token: user_token.into(),
        })? {
            Payload::Order(Some(raw)) => Order::parse(&raw).map(Some),
            Payload::Order(None) => Ok(None),
            other => Err(unexpected("QUERY_ORDER", &other)),
        }
    }
}

fn expect_reply(payload: Payload) -> Result<Reply> {
    match payload {
        Payload::Reply(reply) => Ok(reply),
        other => Err(unexpected("reply", &other)),
    }
}

fn expect_status(payload: Payload) -> Result<TxnStatus> {
    match payload {
        Payload::Status(status) => Ok(status),
        other => Err(unexpected("status", &other)),
    }
}

fn unexpected(what: &str, payload: &Payload) -> RushError {
    RushError::Protocol(format!("expected {} payload, got {:?}", what, payload))
}
