//! Typed Store Module
//!
//! In-memory key space mapping string keys to typed values.
//!
//! ## Responsibilities
//! - Scalar, field-map and set value families
//! - Per-operation atomicity (single RwLock around the key space)
//! - "Existed-before" reporting on every mutation
//! - Integer read-modify-write (incr, compare-and-set, compare-and-incr)
//!
//! ## Data Structure Choice
//! A HashMap wrapped in a parking_lot RwLock:
//! - No ordering requirement (no range scans, no flush)
//! - Reads share the lock, writes take it exclusively
//! - The transaction layer borrows the exclusive guard for multi-key bodies

mod compare;
mod table;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub use compare::CompareOp;
pub use table::{KeySpace, TypedStore};

/// A value held by one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single string, numerically interpretable
    Scalar(String),

    /// Field name -> value (the "hash" family)
    Map(HashMap<String, String>),

    /// Unique members without associated values
    Set(HashSet<String>),
}

/// Reply for scalar, field and set operations
///
/// `flag` carries domain semantics (existed, existed-before, applied, is-member)
/// and is independent from whether the call itself succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub flag: bool,
    pub value: String,
}

impl Reply {
    pub fn new(flag: bool, value: impl Into<String>) -> Self {
        Self {
            flag,
            value: value.into(),
        }
    }

    /// Reply with an empty value
    pub fn flag(flag: bool) -> Self {
        Self {
            flag,
            value: String::new(),
        }
    }
}

/// Reply for `hget_all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapReply {
    pub flag: bool,
    pub value: HashMap<String, String>,
}
