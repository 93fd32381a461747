//! Key namespaces
//!
//! The store itself is prefix-agnostic; these helpers are the single place
//! where keys of each family are built.

pub const ORDER_PREFIX: &str = "order:";
pub const STOCK_PREFIX: &str = "items_stock:";
pub const PRICE_PREFIX: &str = "items_price:";
pub const BALANCE_PREFIX: &str = "balance:";

/// Token of the root user, whose balance receives every payment
pub const ROOT_USER_TOKEN: &str = "0";

pub fn order_key(order_id: &str) -> String {
    format!("{}{}", ORDER_PREFIX, order_id)
}

pub fn stock_key(item_id: u32) -> String {
    format!("{}{}", STOCK_PREFIX, item_id)
}

pub fn price_key(item_id: u32) -> String {
    format!("{}{}", PRICE_PREFIX, item_id)
}

pub fn balance_key(token: &str) -> String {
    format!("{}{}", BALANCE_PREFIX, token)
}
