//! Cart and order records
//!
//! Both live in scalar keys as compact strings.
//!
//! ```text
//! cart:   <item count>[;<item>:<qty>,<item>:<qty>...]      e.g. 3;1:2,7:1
//! order:  <flag>|<total price>|<item count>|<item>:<qty>,...  e.g. W|540|3|1:2,7:1
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RushError};

pub const ORDER_PAID_FLAG: &str = "P";
pub const ORDER_UNPAID_FLAG: &str = "W";

/// Item id -> quantity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<u32, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` units of `item_id`
    pub fn add(&mut self, item_id: u32, qty: u32) {
        if qty > 0 {
            let slot = self.items.entry(item_id).or_insert(0);
            *slot = slot.saturating_add(qty);
        }
    }

    /// Total number of units across all items
    pub fn item_count(&self) -> u32 {
        self.items.values().fold(0u32, |acc, qty| acc.saturating_add(*qty))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &BTreeMap<u32, u32> {
        &self.items
    }

    /// Parse a cart value
    pub fn parse(raw: &str) -> Result<Self> {
        let (count, detail) = match raw.split_once(';') {
            Some((count, detail)) => (count, detail),
            None => (raw, ""),
        };
        let declared: u32 = count
            .trim()
            .parse()
            .map_err(|_| invalid("cart", raw, "bad item count"))?;

        let items = parse_detail(detail).map_err(|reason| invalid("cart", raw, reason))?;
        let cart = Cart { items };
        if cart.item_count() != declared {
            return Err(invalid("cart", raw, "item count does not match detail"));
        }
        Ok(cart)
    }
}

impl fmt::Display for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.item_count())?;
        if !self.items.is_empty() {
            f.write_str(";")?;
            write_detail(f, &self.items)?;
        }
        Ok(())
    }
}

impl FromStr for Cart {
    type Err = RushError;

    fn from_str(s: &str) -> Result<Self> {
        Cart::parse(s)
    }
}

/// A submitted order
///
/// Immutable once written except for the paid flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub paid: bool,
    pub total: i64,
    pub item_count: u32,
    pub items: BTreeMap<u32, u32>,
}

impl Order {
    /// A fresh, unpaid order
    pub fn unpaid(total: i64, cart: &Cart) -> Self {
        Self {
            paid: false,
            total,
            item_count: cart.item_count(),
            items: cart.items.clone(),
        }
    }

    /// Parse an order value
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(4, '|');
        let (flag, total, count, detail) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(flag), Some(total), Some(count), Some(detail)) => {
                    (flag, total, count, detail)
                }
                _ => return Err(invalid("order", raw, "expected 4 fields")),
            };

        let paid = match flag {
            ORDER_PAID_FLAG => true,
            ORDER_UNPAID_FLAG => false,
            _ => return Err(invalid("order", raw, "unknown paid flag")),
        };
        let total = total
            .parse()
            .map_err(|_| invalid("order", raw, "bad total"))?;
        let item_count = count
            .parse()
            .map_err(|_| invalid("order", raw, "bad item count"))?;
        let items = parse_detail(detail).map_err(|reason| invalid("order", raw, reason))?;

        Ok(Self {
            paid,
            total,
            item_count,
            items,
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.paid {
            ORDER_PAID_FLAG
        } else {
            ORDER_UNPAID_FLAG
        };
        write!(f, "{}|{}|{}|", flag, self.total, self.item_count)?;
        write_detail(f, &self.items)
    }
}

impl FromStr for Order {
    type Err = RushError;

    fn from_str(s: &str) -> Result<Self> {
        Order::parse(s)
    }
}

// =============================================================================
// Detail Encoding
// =============================================================================

fn parse_detail(detail: &str) -> std::result::Result<BTreeMap<u32, u32>, &'static str> {
    let mut items = BTreeMap::new();
    if detail.is_empty() {
        return Ok(items);
    }
    for pair in detail.split(',') {
        let (item, qty) = pair.split_once(':').ok_or("item without quantity")?;
        let item: u32 = item.trim().parse().map_err(|_| "bad item id")?;
        let qty: u32 = qty.trim().parse().map_err(|_| "bad quantity")?;
        if qty == 0 {
            return Err("zero quantity");
        }
        let slot = items.entry(item).or_insert(0u32);
        *slot = slot.saturating_add(qty);
    }
    Ok(items)
}

fn write_detail(f: &mut fmt::Formatter<'_>, items: &BTreeMap<u32, u32>) -> fmt::Result {
    for (i, (item, qty)) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}:{}", item, qty)?;
    }
    Ok(())
}

fn invalid(kind: &str, raw: &str, reason: &str) -> RushError {
    RushError::InvalidRecord(format!("{} '{}': {}", kind, raw, reason))
}
