//! Command definitions
//!
//! Represents calls from clients.

use serde::{Deserialize, Serialize};

use crate::store::CompareOp;

/// Command types (frame opcodes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Put = 0x02,
    Del = 0x03,
    Ping = 0x04,
    Incr = 0x05,
    CompareAndSet = 0x06,
    CompareAndIncr = 0x07,
    HGet = 0x10,
    HSet = 0x11,
    HIncr = 0x12,
    HDel = 0x13,
    HDelAll = 0x14,
    HGetAll = 0x15,
    SAdd = 0x20,
    SIsMember = 0x21,
    SDel = 0x22,
    SubmitOrder = 0x30,
    PayOrder = 0x31,
    QueryOrder = 0x32,
}

impl CommandType {
    /// Map an opcode byte back to its type
    pub fn from_u8(byte: u8) -> Option<Self> {
        let ty = match byte {
            0x01 => CommandType::Get,
            0x02 => CommandType::Put,
            0x03 => CommandType::Del,
            0x04 => CommandType::Ping,
            0x05 => CommandType::Incr,
            0x06 => CommandType::CompareAndSet,
            0x07 => CommandType::CompareAndIncr,
            0x10 => CommandType::HGet,
            0x11 => CommandType::HSet,
            0x12 => CommandType::HIncr,
            0x13 => CommandType::HDel,
            0x14 => CommandType::HDelAll,
            0x15 => CommandType::HGetAll,
            0x20 => CommandType::SAdd,
            0x21 => CommandType::SIsMember,
            0x22 => CommandType::SDel,
            0x30 => CommandType::SubmitOrder,
            0x31 => CommandType::PayOrder,
            0x32 => CommandType::QueryOrder,
            _ => return None,
        };
        Some(ty)
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Health check
    Ping,

    // -------------------------------------------------------------------------
    // Scalar
    // -------------------------------------------------------------------------
    Get { key: String },
    Put { key: String, value: String },
    Del { key: String },
    Incr { key: String, delta: i64 },
    CompareAndSet {
        key: String,
        base: i64,
        set_value: i64,
        cmp: CompareOp,
    },
    CompareAndIncr {
        key: String,
        base: i64,
        delta: i64,
        cmp: CompareOp,
    },

    // -------------------------------------------------------------------------
    // Field-map
    // -------------------------------------------------------------------------
    HGet { key: String, field: String },
    HSet { key: String, field: String, value: String },
    HIncr { key: String, field: String, delta: i64 },
    HDel { key: String, field: String },
    HDelAll { key: String },
    HGetAll { key: String },

    // -------------------------------------------------------------------------
    // Set
    // -------------------------------------------------------------------------
    SAdd { key: String, member: String },
    SIsMember { key: String, member: String },
    SDel { key: String },

    // -------------------------------------------------------------------------
    // Compound
    // -------------------------------------------------------------------------
    SubmitOrder {
        cart_id: String,
        user_token: String,
        cart_value: String,
    },
    PayOrder {
        order_id: String,
        user_token: String,
        amount: i64,
    },
    QueryOrder { user_token: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Ping => CommandType::Ping,
            Command::Get { .. } => CommandType::Get,
            Command::Put { .. } => CommandType::Put,
            Command::Del { .. } => CommandType::Del,
            Command::Incr { .. } => CommandType::Incr,
            Command::CompareAndSet { .. } => CommandType::CompareAndSet,
            Command::CompareAndIncr { .. } => CommandType::CompareAndIncr,
            Command::HGet { .. } => CommandType::HGet,
            Command::HSet { .. } => CommandType::HSet,
            Command::HIncr { .. } => CommandType::HIncr,
            Command::HDel { .. } => CommandType::HDel,
            Command::HDelAll { .. } => CommandType::HDelAll,
            Command::HGetAll { .. } => CommandType::HGetAll,
            Command::SAdd { .. } => CommandType::SAdd,
            Command::SIsMember { .. } => CommandType::SIsMember,
            Command::SDel { .. } => CommandType::SDel,
            Command::SubmitOrder { .. } => CommandType::SubmitOrder,
            Command::PayOrder { .. } => CommandType::PayOrder,
            Command::QueryOrder { .. } => CommandType::QueryOrder,
        }
    }

    /// Whether the command may change the store
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Command::Ping
                | Command::Get { .. }
                | Command::HGet { .. }
                | Command::HGetAll { .. }
                | Command::SIsMember { .. }
                | Command::QueryOrder { .. }
        )
    }
}
