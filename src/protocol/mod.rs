//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (Framed bincode)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Op (1)   │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Opcodes
//! - 0x01-0x07: scalar (GET, PUT, DEL, PING, INCR, CAS, CAI)
//! - 0x10-0x15: field-map (HGET, HSET, HINCR, HDEL, HDELALL, HGETALL)
//! - 0x20-0x22: set (SADD, SISMEMBER, SDEL)
//! - 0x30-0x32: compound (SUBMIT_ORDER, PAY_ORDER, QUERY_ORDER)
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK (call succeeded; domain flags live in the payload)
//! - 0x02: ERROR (call failed on the server)

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Payload, Response, Status};
pub use codec::{encode_command, decode_command, encode_response, decode_response};
pub use codec::{read_command, write_command, read_response, write_response};
pub use codec::{HEADER_SIZE, MAX_PAYLOAD_SIZE};
