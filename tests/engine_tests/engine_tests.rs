//! Tests for Engine
//!
//! These tests verify:
//! - Command routing to the store and the order book
//! - Payload shapes per command family
//! - Wipe

use rushkv::engine::Engine;
use rushkv::protocol::{Command, Payload};
use rushkv::store::{CompareOp, Reply};
use rushkv::txn::keys::{balance_key, price_key, stock_key};
use rushkv::txn::TxnStatus;
use rushkv::RushError;

fn exec(engine: &Engine, command: Command) -> Payload {
    engine.execute(command).unwrap()
}

fn put(key: &str, value: &str) -> Command {
    Command::Put {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_ping() {
    let engine = Engine::new();

    assert_eq!(exec(&engine, Command::Ping), Payload::Pong);
}

#[test]
fn test_scalar_commands() {
    let engine = Engine::new();

    assert_eq!(
        exec(&engine, put("k", "1")),
        Payload::Reply(Reply::new(false, "1"))
    );
    assert_eq!(
        exec(&engine, Command::Incr { key: "k".into(), delta: 2 }),
        Payload::Reply(Reply::new(true, "3"))
    );
    assert_eq!(
        exec(
            &engine,
            Command::CompareAndSet {
                key: "k".into(),
                base: 3,
                set_value: 10,
                cmp: CompareOp::Equal,
            }
        ),
        Payload::Reply(Reply::new(true, "10"))
    );
    assert_eq!(
        exec(&engine, Command::Del { key: "k".into() }),
        Payload::Reply(Reply::flag(true))
    );
    assert_eq!(
        exec(&engine, Command::Get { key: "k".into() }),
        Payload::Reply(Reply::flag(false))
    );
}

#[test]
fn test_hash_and_set_commands() {
    let engine = Engine::new();

    exec(
        &engine,
        Command::HSet {
            key: "h".into(),
            field: "f".into(),
            value: "1".into(),
        },
    );
    match exec(&engine, Command::HGetAll { key: "h".into() }) {
        Payload::Map(map) => assert_eq!(map.value["f"], "1"),
        other => panic!("Expected map payload, got {:?}", other),
    }

    exec(
        &engine,
        Command::SAdd {
            key: "s".into(),
            member: "m".into(),
        },
    );
    assert_eq!(
        exec(
            &engine,
            Command::SIsMember {
                key: "s".into(),
                member: "m".into(),
            }
        ),
        Payload::Reply(Reply::flag(true))
    );
}

#[test]
fn test_order_commands() {
    let engine = Engine::new();
    exec(&engine, put(&stock_key(1), "3"));
    exec(&engine, put(&price_key(1), "25"));
    exec(&engine, put(&balance_key("7"), "100"));

    assert_eq!(
        exec(
            &engine,
            Command::SubmitOrder {
                cart_id: "1".into(),
                user_token: "7".into(),
                cart_value: "2;1:2".into(),
            }
        ),
        Payload::Status(TxnStatus::Ok)
    );
    assert_eq!(
        exec(&engine, Command::QueryOrder { user_token: "7".into() }),
        Payload::Order(Some("W|50|2|1:2".to_string()))
    );
    assert_eq!(
        exec(
            &engine,
            Command::PayOrder {
                order_id: "7".into(),
                user_token: "7".into(),
                amount: 50,
            }
        ),
        Payload::Status(TxnStatus::Ok)
    );
    assert_eq!(
        exec(&engine, Command::QueryOrder { user_token: "8".into() }),
        Payload::Order(None)
    );
}

#[test]
fn test_store_errors_propagate() {
    let engine = Engine::new();
    exec(&engine, put("word", "abc"));

    let err = engine
        .execute(Command::Incr {
            key: "word".into(),
            delta: 1,
        })
        .unwrap_err();
    assert!(matches!(err, RushError::NotAnInteger { .. }));
}

#[test]
fn test_wipe() {
    let engine = Engine::new();
    exec(&engine, put("a", "1"));
    exec(&engine, put("b", "2"));
    assert_eq!(engine.key_count(), 2);

    engine.wipe();

    assert_eq!(engine.key_count(), 0);
}

#[test]
fn test_mutation_classification() {
    assert!(put("a", "1").is_mutation());
    assert!(!Command::Get { key: "a".into() }.is_mutation());
    assert!(!Command::QueryOrder { user_token: "1".into() }.is_mutation());
    assert!(Command::PayOrder {
        order_id: "1".into(),
        user_token: "1".into(),
        amount: 1,
    }
    .is_mutation());
}
