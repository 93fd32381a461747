//! Typed store implementation
//!
//! HashMap-based key space with a parking_lot RwLock for concurrency.

use std::collections::{HashMap, HashSet};

use parking_lot::{RwLock, RwLockWriteGuard};

use super::{CompareOp, MapReply, Reply, Value};
use crate::error::{Result, RushError};

type Data = HashMap<String, Value>;

/// In-memory key space shared by every connection
///
/// Each public operation holds the lock for its whole read-modify-write, so
/// concurrent callers never observe a half-applied operation.
pub struct TypedStore {
    data: RwLock<Data>,
}

impl TypedStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Take the exclusive guard over the whole key space
    ///
    /// Used by compound operations that must appear atomic across keys.
    pub fn lock(&self) -> KeySpace<'_> {
        KeySpace {
            data: self.data.write(),
        }
    }

    // =========================================================================
    // Scalar Family
    // =========================================================================

    /// Read a scalar
    pub fn get(&self, key: &str) -> Result<Reply> {
        let data = self.data.read();
        Ok(match scalar(&data, key)? {
            Some(value) => Reply::new(true, value.as_str()),
            None => Reply::flag(false),
        })
    }

    /// Overwrite a scalar, reporting whether it existed before
    pub fn put(&self, key: &str, value: &str) -> Result<Reply> {
        let existed = self.lock().put(key, value)?;
        Ok(Reply::new(existed, value))
    }

    /// Remove a scalar
    pub fn del(&self, key: &str) -> Result<Reply> {
        let mut data = self.data.write();
        if let Some(Value::Map(_)) | Some(Value::Set(_)) = data.get(key) {
            return Err(wrong_type(key));
        }
        Ok(Reply::flag(data.remove(key).is_some()))
    }

    /// Add `delta` to an integer scalar (missing key counts as 0)
    pub fn incr(&self, key: &str, delta: i64) -> Result<Reply> {
        let (existed, value) = self.lock().incr(key, delta)?;
        Ok(Reply::new(existed, value.to_string()))
    }

    /// Set to `set_value` iff `cmp(current, base)` holds
    ///
    /// The reply value is the current value after the call.
    pub fn compare_and_set(
        &self,
        key: &str,
        base: i64,
        set_value: i64,
        cmp: CompareOp,
    ) -> Result<Reply> {
        let mut space = self.lock();
        let current = space.get_int(key)?.unwrap_or(0);
        if !cmp.holds(current, base) {
            return Ok(Reply::new(false, current.to_string()));
        }
        let value = set_value.to_string();
        space.put(key, &value)?;
        Ok(Reply::new(true, value))
    }

    /// Add `delta` iff `cmp(current, base)` holds
    pub fn compare_and_incr(
        &self,
        key: &str,
        base: i64,
        delta: i64,
        cmp: CompareOp,
    ) -> Result<Reply> {
        let mut space = self.lock();
        let current = space.get_int(key)?.unwrap_or(0);
        if !cmp.holds(current, base) {
            return Ok(Reply::new(false, current.to_string()));
        }
        let (_, value) = space.incr(key, delta)?;
        Ok(Reply::new(true, value.to_string()))
    }

    // =========================================================================
    // Field-Map Family
    // =========================================================================

    /// Read one field of a map
    pub fn hget(&self, key: &str, field: &str) -> Result<Reply> {
        let data = self.data.read();
        let value = match data.get(key) {
            None => None,
            Some(Value::Map(map)) => map.get(field),
            Some(_) => return Err(wrong_type(key)),
        };
        Ok(match value {
            Some(value) => Reply::new(true, value.as_str()),
            None => Reply::flag(false),
        })
    }

    /// Write one field, reporting whether the field existed before
    pub fn hset(&self, key: &str, field: &str, value: &str) -> Result<Reply> {
        let mut data = self.data.write();
        let map = map_entry(&mut data, key)?;
        let existed = map.insert(field.to_string(), value.to_string()).is_some();
        Ok(Reply::new(existed, value))
    }

    /// Add `delta` to an integer field (missing field counts as 0)
    pub fn hincr(&self, key: &str, field: &str, delta: i64) -> Result<Reply> {
        let mut data = self.data.write();
        let map = map_entry(&mut data, key)?;
        let (existed, current) = match map.get(field) {
            Some(raw) => (true, parse_int(key, raw)?),
            None => (false, 0),
        };
        let next = add(key, current, delta)?.to_string();
        map.insert(field.to_string(), next.clone());
        Ok(Reply::new(existed, next))
    }

    /// Remove one field; the key disappears with its last field
    pub fn hdel(&self, key: &str, field: &str) -> Result<Reply> {
        let mut data = self.data.write();
        let (existed, now_empty) = match data.get_mut(key) {
            None => (false, false),
            Some(Value::Map(map)) => (map.remove(field).is_some(), map.is_empty()),
            Some(_) => return Err(wrong_type(key)),
        };
        if now_empty {
            data.remove(key);
        }
        Ok(Reply::flag(existed))
    }

    /// Remove a whole map
    pub fn hdel_all(&self, key: &str) -> Result<Reply> {
        let mut data = self.data.write();
        match data.get(key) {
            None => Ok(Reply::flag(false)),
            Some(Value::Map(_)) => {
                data.remove(key);
                Ok(Reply::flag(true))
            }
            Some(_) => Err(wrong_type(key)),
        }
    }

    /// Snapshot every field of a map
    pub fn hget_all(&self, key: &str) -> Result<MapReply> {
        let data = self.data.read();
        match data.get(key) {
            None => Ok(MapReply::default()),
            Some(Value::Map(map)) => Ok(MapReply {
                flag: !map.is_empty(),
                value: map.clone(),
            }),
            Some(_) => Err(wrong_type(key)),
        }
    }

    // =========================================================================
    // Set Family
    // =========================================================================

    /// Add a member, reporting whether it was already present
    pub fn sadd(&self, key: &str, member: &str) -> Result<Reply> {
        let mut data = self.data.write();
        let set = match data
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(HashSet::new()))
        {
            Value::Set(set) => set,
            _ => return Err(wrong_type(key)),
        };
        Ok(Reply::flag(!set.insert(member.to_string())))
    }

    /// Membership test
    pub fn sis_member(&self, key: &str, member: &str) -> Result<Reply> {
        let data = self.data.read();
        match data.get(key) {
            None => Ok(Reply::flag(false)),
            Some(Value::Set(set)) => Ok(Reply::flag(set.contains(member))),
            Some(_) => Err(wrong_type(key)),
        }
    }

    /// Remove a whole set
    pub fn sdel(&self, key: &str) -> Result<Reply> {
        let mut data = self.data.write();
        match data.get(key) {
            None => Ok(Reply::flag(false)),
            Some(Value::Set(_)) => {
                data.remove(key);
                Ok(Reply::flag(true))
            }
            Some(_) => Err(wrong_type(key)),
        }
    }

    // =========================================================================
    // Whole-Store Operations
    // =========================================================================

    /// Drop every key
    pub fn wipe(&self) {
        self.data.write().clear();
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for TypedStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive view over the key space
///
/// Holds the store's write lock until dropped. Only scalar primitives are
/// exposed: compound operations work on counters and record strings.
pub struct KeySpace<'a> {
    data: RwLockWriteGuard<'a, Data>,
}

impl KeySpace<'_> {
    /// Read a scalar
    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        Ok(scalar(&self.data, key)?.map(String::as_str))
    }

    /// Read an integer scalar
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        match scalar(&self.data, key)? {
            Some(raw) => Ok(Some(parse_int(key, raw)?)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Overwrite a scalar, returning whether it existed before
    pub fn put(&mut self, key: &str, value: &str) -> Result<bool> {
        match self.data.get_mut(key) {
            Some(Value::Scalar(current)) => {
                value.clone_into(current);
                Ok(true)
            }
            Some(_) => Err(wrong_type(key)),
            None => {
                self.data
                    .insert(key.to_string(), Value::Scalar(value.to_string()));
                Ok(false)
            }
        }
    }

    /// Add `delta` (missing counts as 0), returning (existed-before, new value)
    pub fn incr(&mut self, key: &str, delta: i64) -> Result<(bool, i64)> {
        let current = self.get_int(key)?;
        let next = add(key, current.unwrap_or(0), delta)?;
        self.put(key, &next.to_string())?;
        Ok((current.is_some(), next))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn scalar<'a>(data: &'a Data, key: &str) -> Result<Option<&'a String>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Scalar(value)) => Ok(Some(value)),
        Some(_) => Err(wrong_type(key)),
    }
}

fn map_entry<'a>(data: &'a mut Data, key: &str) -> Result<&'a mut HashMap<String, String>> {
    match data
        .entry(key.to_string())
        .or_insert_with(|| Value::Map(HashMap::new()))
    {
        Value::Map(map) => Ok(map),
        _ => Err(wrong_type(key)),
    }
}

fn parse_int(key: &str, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| RushError::NotAnInteger {
        key: key.to_string(),
    })
}

fn add(key: &str, current: i64, delta: i64) -> Result<i64> {
    current
        .checked_add(delta)
        .ok_or_else(|| RushError::IntegerOverflow {
            key: key.to_string(),
        })
}

fn wrong_type(key: &str) -> RushError {
    RushError::WrongType {
        key: key.to_string(),
    }
}
