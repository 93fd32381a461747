//! Order book
//!
//! Submission and payment as single atomic units over the typed store.

use std::sync::Arc;

use parking_lot::RwLock;

use super::keys;
use super::record::{Cart, Order};
use super::TxnStatus;
use crate::error::{Result, RushError};
use crate::store::TypedStore;

/// Compound order operations
///
/// Holds the store by reference plus its own lock. Every check of a compound
/// operation runs before its first mutation, so a rejected call leaves the
/// store untouched.
pub struct OrderBook {
    /// Shared key space
    store: Arc<TypedStore>,

    /// Write mode: submission and payment. Read mode: order queries.
    lock: RwLock<()>,

    /// Token whose balance is credited by every payment
    settlement_token: String,
}

impl OrderBook {
    /// Create an order book settling payments to the root user
    pub fn new(store: Arc<TypedStore>) -> Self {
        Self::with_settlement_account(store, keys::ROOT_USER_TOKEN)
    }

    /// Create an order book settling payments to `token`
    pub fn with_settlement_account(store: Arc<TypedStore>, token: impl Into<String>) -> Self {
        Self {
            store,
            lock: RwLock::new(()),
            settlement_token: token.into(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<TypedStore> {
        &self.store
    }

    pub fn settlement_token(&self) -> &str {
        &self.settlement_token
    }

    /// Turn a cart into an unpaid order for `user_token`
    ///
    /// Steps (all under the write lock):
    /// 1. Every item has enough stock, else `OutOfStock`
    /// 2. The user has no order yet, else `OrderOutOfLimit`
    /// 3. Price the cart
    /// 4. Decrement stock and write the order record
    pub fn submit_order(
        &self,
        cart_id: &str,
        user_token: &str,
        cart_value: &str,
    ) -> Result<TxnStatus> {
        let cart = Cart::parse(cart_value)?;
        if cart.is_empty() {
            return Err(RushError::InvalidArgument(format!(
                "cart {} is empty",
                cart_id
            )));
        }
        let order_key = keys::order_key(user_token);

        let _txn = self.lock.write();
        let mut space = self.store.lock();

        // Step 1: Stock check for every item before touching anything
        for (&item, &qty) in cart.items() {
            let stock = space.get_int(&keys::stock_key(item))?.unwrap_or(0);
            if stock < i64::from(qty) {
                tracing::debug!(
                    "Order rejected for {}: item {} has {} in stock, {} requested",
                    user_token, item, stock, qty
                );
                return Ok(TxnStatus::OutOfStock);
            }
        }

        // Step 2: One order per user
        if space.contains(&order_key) {
            tracing::debug!("Order rejected for {}: order already exists", user_token);
            return Ok(TxnStatus::OrderOutOfLimit);
        }

        // Step 3: Price the cart (read-only, so a bad price aborts cleanly)
        let mut total: i64 = 0;
        for (&item, &qty) in cart.items() {
            let price_key = keys::price_key(item);
            let price = space.get_int(&price_key)?.unwrap_or(0);
            total = price
                .checked_mul(i64::from(qty))
                .and_then(|line| total.checked_add(line))
                .ok_or(RushError::IntegerOverflow { key: price_key })?;
        }

        // Step 4: Apply
        for (&item, &qty) in cart.items() {
            space.incr(&keys::stock_key(item), -i64::from(qty))?;
        }
        let order = Order::unpaid(total, &cart);
        space.put(&order_key, &order.to_string())?;

        tracing::debug!(
            "Order created for {} from cart {}: {} items, total {}",
            user_token, cart_id, order.item_count, total
        );
        Ok(TxnStatus::Ok)
    }

    /// Pay `amount` for order `order_id` from `user_token`'s balance
    ///
    /// Steps (all under the write lock):
    /// 1. The order exists, else `OrderNotFound`
    /// 2. The order is unpaid, else `OrderPaid`
    /// 3. The payer can cover `amount`, else `BalanceInsufficient`
    /// 4. Debit payer, credit settlement account, flip the paid flag
    pub fn pay_order(&self, order_id: &str, user_token: &str, amount: i64) -> Result<TxnStatus> {
        if amount < 0 {
            return Err(RushError::InvalidArgument(format!(
                "negative payment amount {}",
                amount
            )));
        }
        let order_key = keys::order_key(order_id);
        let payer_key = keys::balance_key(user_token);
        let settlement_key = keys::balance_key(&self.settlement_token);

        let _txn = self.lock.write();
        let mut space = self.store.lock();

        let mut order = match space.get(&order_key)? {
            Some(raw) => Order::parse(raw)?,
            None => return Ok(TxnStatus::OrderNotFound),
        };
        if order.paid {
            tracing::debug!("Payment rejected for order {}: already paid", order_id);
            return Ok(TxnStatus::OrderPaid);
        }

        let balance = space.get_int(&payer_key)?.unwrap_or(0);
        if balance < amount {
            tracing::debug!(
                "Payment rejected for order {}: balance {} < {}",
                order_id, balance, amount
            );
            return Ok(TxnStatus::BalanceInsufficient);
        }

        // Paying into the settlement account itself nets to zero
        if payer_key != settlement_key {
            let settled = space
                .get_int(&settlement_key)?
                .unwrap_or(0)
                .checked_add(amount)
                .ok_or_else(|| RushError::IntegerOverflow {
                    key: settlement_key.clone(),
                })?;
            space.put(&payer_key, &(balance - amount).to_string())?;
            space.put(&settlement_key, &settled.to_string())?;
        }

        order.paid = true;
        space.put(&order_key, &order.to_string())?;

        tracing::debug!("Order {} paid by {}: {}", order_id, user_token, amount);
        Ok(TxnStatus::Ok)
    }

    /// Look up the order of `user_token` (shared lock)
    pub fn query_order(&self, user_token: &str) -> Result<Option<Order>> {
        let _txn = self.lock.read();
        let reply = self.store.get(&keys::order_key(user_token))?;
        if !reply.flag {
            return Ok(None);
        }
        Order::parse(&reply.value).map(Some)
    }
}
