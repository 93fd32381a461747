//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RushError};
use crate::store::{MapReply, Reply};
use crate::txn::TxnStatus;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    Error = 0x02,
}

/// Body of a successful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Pong,
    Reply(Reply),
    Map(MapReply),
    Status(TxnStatus),
    /// Encoded order record, if the user has one
    Order(Option<String>),
}

/// A response to send to client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (bincode `Payload` for OK, message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an OK response carrying a serialized payload
    pub fn with_payload(payload: &Payload) -> Result<Self> {
        Ok(Self::ok(Some(bincode::serialize(payload)?)))
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Unpack the call result
    ///
    /// ERROR responses become `RushError::Remote`.
    pub fn into_payload(self) -> Result<Payload> {
        let bytes = self.payload.unwrap_or_default();
        match self.status {
            Status::Ok => Ok(bincode::deserialize(&bytes)?),
            Status::Error => Err(RushError::Remote(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
        }
    }
}
