//! Transaction Module
//!
//! Compound order operations over the typed store.
//!
//! ## Responsibilities
//! - Order submission: stock check, one-order-per-user, stock decrement
//! - Order payment: paid-flag check, balance check, debit/credit, flag flip
//! - Key namespaces shared with application handlers
//!
//! ## Concurrency Model
//! One reader/writer lock serializes submission and payment against each
//! other and themselves. While a compound body runs it also holds the store's
//! exclusive key-space guard, so single-key calls from other connections see
//! either none or all of its effects.
//!
//! Lock order is always: order-book lock -> key-space guard.

pub mod keys;
mod order_book;
mod record;

use serde::{Deserialize, Serialize};

pub use order_book::OrderBook;
pub use record::{Cart, Order, ORDER_PAID_FLAG, ORDER_UNPAID_FLAG};

/// Outcome of a compound operation
///
/// Non-OK values are domain rejections: the call succeeded and nothing was
/// mutated. Retrying without new input changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxnStatus {
    Ok = 0,
    OutOfStock = 1,
    OrderOutOfLimit = 2,
    OrderPaid = 3,
    BalanceInsufficient = 4,
    OrderNotFound = 5,
}

impl TxnStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == TxnStatus::Ok
    }
}

impl std::fmt::Display for TxnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TxnStatus::Ok => "OK",
            TxnStatus::OutOfStock => "OUT_OF_STOCK",
            TxnStatus::OrderOutOfLimit => "ORDER_OUT_OF_LIMIT",
            TxnStatus::OrderPaid => "ORDER_PAID",
            TxnStatus::BalanceInsufficient => "BALANCE_INSUFFICIENT",
            TxnStatus::OrderNotFound => "ORDER_NOT_FOUND",
        };
        f.write_str(name)
    }
}
