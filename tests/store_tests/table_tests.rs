//! Tests for TypedStore
//!
//! These tests verify:
//! - Scalar get/put/del/incr and the existed-before convention
//! - Conditional updates (compare-and-set, compare-and-incr)
//! - Field-map and set families
//! - Variant misuse errors
//! - Concurrent access without lost writes

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use rushkv::store::{CompareOp, MapReply, Reply, TypedStore};
use rushkv::RushError;

// =============================================================================
// Scalar Tests
// =============================================================================

#[test]
fn test_get_never_written() {
    let store = TypedStore::new();

    assert_eq!(store.get("missing").unwrap(), Reply::flag(false));
}

#[test]
fn test_put_get_del_scenario() {
    let store = TypedStore::new();

    assert_eq!(store.put("k", "1").unwrap(), Reply::new(false, "1"));
    assert_eq!(store.get("k").unwrap(), Reply::new(true, "1"));

    store.del("k").unwrap();
    assert_eq!(store.get("k").unwrap(), Reply::flag(false));
}

#[test]
fn test_put_reports_existed_before() {
    let store = TypedStore::new();

    assert!(!store.put("k", "a").unwrap().flag);
    let reply = store.put("k", "b").unwrap();
    assert!(reply.flag);
    assert_eq!(reply.value, "b");
}

#[test]
fn test_empty_string_is_present() {
    let store = TypedStore::new();

    store.put("empty", "").unwrap();
    assert_eq!(store.get("empty").unwrap(), Reply::new(true, ""));
}

#[test]
fn test_del_reports_existed_before() {
    let store = TypedStore::new();

    assert!(!store.del("k").unwrap().flag);
    store.put("k", "v").unwrap();
    assert!(store.del("k").unwrap().flag);
    assert!(store.is_empty());
}

#[test]
fn test_incr_missing_starts_at_zero() {
    let store = TypedStore::new();

    assert_eq!(store.incr("n", 5).unwrap(), Reply::new(false, "5"));
    assert_eq!(store.incr("n", -7).unwrap(), Reply::new(true, "-2"));
    assert_eq!(store.get("n").unwrap(), Reply::new(true, "-2"));
}

#[test]
fn test_incr_sums_deltas() {
    let store = TypedStore::new();

    store.incr("a", 3).unwrap();
    store.put("other", "x").unwrap();
    store.incr("a", 4).unwrap();

    assert_eq!(store.get("a").unwrap().value, "7");
}

#[test]
fn test_incr_non_integer() {
    let store = TypedStore::new();
    store.put("word", "hello").unwrap();

    let err = store.incr("word", 1).unwrap_err();
    assert!(matches!(err, RushError::NotAnInteger { .. }));
    assert_eq!(store.get("word").unwrap().value, "hello");
}

#[test]
fn test_incr_overflow() {
    let store = TypedStore::new();
    store.put("big", &i64::MAX.to_string()).unwrap();

    let err = store.incr("big", 1).unwrap_err();
    assert!(matches!(err, RushError::IntegerOverflow { .. }));
}

// =============================================================================
// Conditional Update Tests
// =============================================================================

#[test]
fn test_compare_and_set_applies() {
    let store = TypedStore::new();
    store.put("stock", "5").unwrap();

    let reply = store.compare_and_set("stock", 10, 9, CompareOp::Less).unwrap();
    assert_eq!(reply, Reply::new(true, "9"));
    assert_eq!(store.get("stock").unwrap().value, "9");
}

#[test]
fn test_compare_and_set_rejected_returns_current() {
    let store = TypedStore::new();
    store.put("stock", "5").unwrap();

    let reply = store.compare_and_set("stock", 5, 9, CompareOp::Greater).unwrap();
    assert_eq!(reply, Reply::new(false, "5"));
    assert_eq!(store.get("stock").unwrap().value, "5");
}

#[test]
fn test_compare_and_set_missing_counts_as_zero() {
    let store = TypedStore::new();

    let reply = store.compare_and_set("fresh", 0, 1, CompareOp::Equal).unwrap();
    assert_eq!(reply, Reply::new(true, "1"));
}

#[test]
fn test_compare_and_incr() {
    let store = TypedStore::new();
    store.put("stock", "2").unwrap();

    // Decrement only while something is left
    let first = store.compare_and_incr("stock", 0, -1, CompareOp::Greater).unwrap();
    let second = store.compare_and_incr("stock", 0, -1, CompareOp::Greater).unwrap();
    let third = store.compare_and_incr("stock", 0, -1, CompareOp::Greater).unwrap();

    assert_eq!(first, Reply::new(true, "1"));
    assert_eq!(second, Reply::new(true, "0"));
    assert_eq!(third, Reply::new(false, "0"));
}

#[test]
fn test_concurrent_compare_and_incr_never_negative() {
    let store = Arc::new(TypedStore::new());
    store.put("stock", "50").unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let mut won = 0;
            for _ in 0..20 {
                if store
                    .compare_and_incr("stock", 0, -1, CompareOp::Greater)
                    .unwrap()
                    .flag
                {
                    won += 1;
                }
            }
            won
        }));
    }

    let won: i32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(won, 50);
    assert_eq!(store.get("stock").unwrap().value, "0");
}

// =============================================================================
// Field-Map Tests
// =============================================================================

#[test]
fn test_hset_hincr_hgetall_scenario() {
    let store = TypedStore::new();

    assert_eq!(store.hset("h", "f", "1").unwrap(), Reply::new(false, "1"));
    assert_eq!(store.hincr("h", "f", 1).unwrap(), Reply::new(true, "2"));

    let all = store.hget_all("h").unwrap();
    assert!(all.flag);
    assert_eq!(all.value, HashMap::from([("f".to_string(), "2".to_string())]));
}

#[test]
fn test_hget_never_written() {
    let store = TypedStore::new();

    assert_eq!(store.hget("h", "f").unwrap(), Reply::flag(false));
    store.hset("h", "other", "1").unwrap();
    assert_eq!(store.hget("h", "f").unwrap(), Reply::flag(false));
}

#[test]
fn test_hincr_missing_field() {
    let store = TypedStore::new();
    store.hset("h", "a", "1").unwrap();

    assert_eq!(store.hincr("h", "b", 10).unwrap(), Reply::new(false, "10"));
}

#[test]
fn test_hdel_last_field_removes_key() {
    let store = TypedStore::new();
    store.hset("h", "a", "1").unwrap();

    assert!(store.hdel("h", "a").unwrap().flag);
    assert!(!store.hdel("h", "a").unwrap().flag);
    assert_eq!(store.hget_all("h").unwrap(), MapReply::default());
    assert!(store.is_empty());
}

#[test]
fn test_hdel_all() {
    let store = TypedStore::new();
    store.hset("h", "a", "1").unwrap();
    store.hset("h", "b", "2").unwrap();

    assert!(store.hdel_all("h").unwrap().flag);
    assert!(!store.hget_all("h").unwrap().flag);
    assert!(!store.hdel_all("h").unwrap().flag);
}

#[test]
fn test_concurrent_hash_writes_disjoint_fields() {
    let store = Arc::new(TypedStore::new());

    let mut handles = vec![];
    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for j in 0..100 {
                let field = format!("field{}_{}", t, j);
                store.hset("hash", &field, &j.to_string()).unwrap();
                store.hincr("hash", &field, j).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let all = store.hget_all("hash").unwrap();
    assert_eq!(all.value.len(), 800);
    for t in 0..8 {
        for j in 0..100 {
            let field = format!("field{}_{}", t, j);
            assert_eq!(all.value[&field], (j * 2).to_string());
        }
    }
}

// =============================================================================
// Set Tests
// =============================================================================

#[test]
fn test_set_membership() {
    let store = TypedStore::new();

    assert!(!store.sis_member("s", "a").unwrap().flag);
    assert!(!store.sadd("s", "a").unwrap().flag);
    assert!(store.sadd("s", "a").unwrap().flag);
    assert!(store.sis_member("s", "a").unwrap().flag);
    assert!(!store.sis_member("s", "b").unwrap().flag);

    assert!(store.sdel("s").unwrap().flag);
    assert!(!store.sis_member("s", "a").unwrap().flag);
}

// =============================================================================
// Variant Misuse Tests
// =============================================================================

#[test]
fn test_wrong_type_is_reported() {
    let store = TypedStore::new();
    store.put("scalar", "1").unwrap();
    store.hset("map", "f", "1").unwrap();
    store.sadd("set", "m").unwrap();

    assert!(matches!(store.hget("scalar", "f"), Err(RushError::WrongType { .. })));
    assert!(matches!(store.sadd("map", "m"), Err(RushError::WrongType { .. })));
    assert!(matches!(store.get("set"), Err(RushError::WrongType { .. })));
    assert!(matches!(store.put("map", "x"), Err(RushError::WrongType { .. })));
    assert!(matches!(store.del("set"), Err(RushError::WrongType { .. })));

    // Nothing was replaced
    assert_eq!(store.hget("map", "f").unwrap(), Reply::new(true, "1"));
}

#[test]
fn test_wipe() {
    let store = TypedStore::new();
    store.put("a", "1").unwrap();
    store.hset("b", "f", "1").unwrap();
    store.sadd("c", "m").unwrap();
    assert_eq!(store.len(), 3);

    store.wipe();

    assert!(store.is_empty());
    assert!(!store.get("a").unwrap().flag);
}

// =============================================================================
// KeySpace Tests
// =============================================================================

#[test]
fn test_key_space_guard() {
    let store = TypedStore::new();
    {
        let mut space = store.lock();
        assert!(!space.put("a", "1").unwrap());
        assert_eq!(space.incr("a", 2).unwrap(), (true, 3));
        assert_eq!(space.get_int("a").unwrap(), Some(3));
        assert_eq!(space.get("missing").unwrap(), None);
        assert!(space.contains("a"));
    }
    assert_eq!(store.get("a").unwrap().value, "3");
}
