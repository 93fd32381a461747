//! Server Tests
//!
//! End-to-end calls against a live server on a loopback port.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use rushkv::client::{is_quiet_dial_error, ClientConnection};
use rushkv::config::Config;
use rushkv::engine::Engine;
use rushkv::network::Server;
use rushkv::protocol::{Command, Payload};
use rushkv::store::{CompareOp, Reply};
use rushkv::txn::keys::{balance_key, price_key, stock_key, ROOT_USER_TOKEN};
use rushkv::txn::TxnStatus;
use rushkv::{Client, RemoteCall, RushError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_server_with(config: Config) -> (Server, String) {
    let mut server = Server::new(config, Arc::new(Engine::new()));
    let addr = server.serve().unwrap();
    (server, addr.to_string())
}

fn setup_server() -> (Server, String) {
    let config = Config::builder().listen_addr("127.0.0.1:0").build().unwrap();
    setup_server_with(config)
}

fn dial(addr: &str) -> ClientConnection {
    ClientConnection::dial(addr, Some(Duration::from_secs(1)), Some(Duration::from_secs(2)))
        .unwrap()
}

// =============================================================================
// Basic Operation Tests
// =============================================================================

#[test]
fn test_ping() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);

    client.ping().unwrap();
}

#[test]
fn test_put_get_del_scenario() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);

    assert_eq!(client.put("k", "1").unwrap(), Reply::new(false, "1"));
    assert_eq!(client.get("k").unwrap(), Reply::new(true, "1"));
    assert!(client.del("k").unwrap().flag);
    assert_eq!(client.get("k").unwrap(), Reply::flag(false));
}

#[test]
fn test_hash_scenario() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);

    client.hset("h", "f", "1").unwrap();
    assert_eq!(client.hincr("h", "f", 1).unwrap(), Reply::new(true, "2"));

    let all = client.hget_all("h").unwrap();
    assert!(all.flag);
    assert_eq!(all.value.get("f").map(String::as_str), Some("2"));
}

#[test]
fn test_set_scenario() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);

    assert!(!client.sadd("s", "a").unwrap().flag);
    assert!(client.sis_member("s", "a").unwrap().flag);
    assert!(client.sdel("s").unwrap().flag);
    assert!(!client.sis_member("s", "a").unwrap().flag);
}

#[test]
fn test_conditional_updates() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);
    client.put("n", "1").unwrap();

    let rejected = client.compare_and_incr("n", 5, 1, CompareOp::Greater).unwrap();
    assert_eq!(rejected, Reply::new(false, "1"));

    let applied = client.compare_and_set("n", 5, 7, CompareOp::Less).unwrap();
    assert_eq!(applied, Reply::new(true, "7"));
}

#[test]
fn test_store_error_is_remote() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);
    client.hset("h", "f", "1").unwrap();

    match client.get("h") {
        Err(e @ RushError::Remote(_)) => assert!(!e.is_connection_error()),
        other => panic!("Expected remote error, got {:?}", other),
    }
}

#[test]
fn test_many_calls_on_one_connection() {
    let (_server, addr) = setup_server();
    let mut conn = dial(&addr);

    for i in 0..100 {
        let payload = conn
            .round_trip(&Command::Incr {
                key: "counter".to_string(),
                delta: 1,
            })
            .unwrap();
        assert_eq!(payload, Payload::Reply(Reply::new(i > 0, (i + 1).to_string())));
    }
}

// =============================================================================
// Order Tests
// =============================================================================

#[test]
fn test_order_flow() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr);
    client.put(&stock_key(1), "5").unwrap();
    client.put(&price_key(1), "20").unwrap();
    client.put(&balance_key("u"), "100").unwrap();

    assert_eq!(client.submit_order("c1", "u", "2;1:2").unwrap(), TxnStatus::Ok);
    assert_eq!(client.pay_order("u", "u", 40).unwrap(), TxnStatus::Ok);
    assert_eq!(client.pay_order("u", "u", 40).unwrap(), TxnStatus::OrderPaid);

    let order = client.query_order("u").unwrap().unwrap();
    assert!(order.paid);
    assert_eq!(order.total, 40);
    assert_eq!(client.get(&balance_key("u")).unwrap().value, "60");
    assert_eq!(client.get(&balance_key(ROOT_USER_TOKEN)).unwrap().value, "40");
}

#[test]
fn test_concurrent_submit_single_unit() {
    let (_server, addr) = setup_server();
    let client = Client::new(addr.clone());
    client.put(&stock_key(1), "1").unwrap();
    client.put(&price_key(1), "10").unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|user| {
            let addr = addr.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let client = Client::new(addr);
                barrier.wait();
                client.submit_order("c", user, "1;1:1").unwrap()
            })
        })
        .collect();

    let mut statuses: Vec<TxnStatus> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    statuses.sort_by_key(|s| s.code());

    assert_eq!(statuses, vec![TxnStatus::Ok, TxnStatus::OutOfStock]);
    assert_eq!(client.get(&stock_key(1)).unwrap().value, "0");
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_dead_address_is_connection_error() {
    // Bind then release a port so nothing is listening on it
    let (mut server, addr) = setup_server();
    server.kill();

    let err = Client::new(addr).ping().unwrap_err();
    assert!(err.is_connection_error());
}

#[test]
fn test_dial_error_quietness() {
    let (mut server, addr) = setup_server();
    server.kill();

    // Nobody listening is the expected startup case
    let refused = ClientConnection::dial(&addr, Some(Duration::from_secs(1)), None)
        .err()
        .unwrap();
    assert!(is_quiet_dial_error(&refused));

    let timed_out = RushError::Io(std::io::Error::from(std::io::ErrorKind::TimedOut));
    assert!(!is_quiet_dial_error(&timed_out));
    assert!(!is_quiet_dial_error(&RushError::Network("no route".to_string())));
    assert!(!is_quiet_dial_error(&RushError::Remote("busy".to_string())));
}

#[test]
fn test_kill_drops_live_connections_and_wipes() {
    let (mut server, addr) = setup_server();
    let mut conn = dial(&addr);
    conn.round_trip(&Command::Put {
        key: "k".to_string(),
        value: "v".to_string(),
    })
    .unwrap();
    assert_eq!(server.engine().key_count(), 1);

    server.kill();

    assert!(!server.is_running());
    assert_eq!(server.engine().key_count(), 0);
    let err = conn.round_trip(&Command::Ping).unwrap_err();
    assert!(err.is_connection_error());

    // Idempotent
    server.kill();
}

#[test]
fn test_serve_twice_fails() {
    let (mut server, _addr) = setup_server();

    assert!(matches!(server.serve(), Err(RushError::ServerStopped)));
}

#[test]
fn test_bind_conflict() {
    let (_server, addr) = setup_server();
    let config = Config::builder().listen_addr(addr).build().unwrap();
    let mut second = Server::new(config, Arc::new(Engine::new()));

    assert!(matches!(second.serve(), Err(RushError::Network(_))));
}

#[test]
fn test_shutdown_handle_stops_run() {
    let config = Config::builder().listen_addr("127.0.0.1:0").build().unwrap();
    let mut server = Server::new(config, Arc::new(Engine::new()));
    let handle = server.shutdown_handle();

    let runner = thread::spawn(move || server.run());
    thread::sleep(Duration::from_millis(50));
    handle.shutdown();

    let result = runner.join().unwrap();
    assert!(matches!(result, Ok(()) | Err(RushError::ServerStopped)));
}

#[test]
fn test_max_connections_rejects_extra() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .max_connections(1)
        .build()
        .unwrap();
    let (server, addr) = setup_server_with(config);

    let mut first = dial(&addr);
    first.round_trip(&Command::Ping).unwrap();
    assert_eq!(server.connection_count(), 1);

    // TCP accepts, then the server closes it without serving
    let mut second = dial(&addr);
    assert!(second.round_trip(&Command::Ping).is_err());

    // The served connection is unaffected
    assert_eq!(first.round_trip(&Command::Ping).unwrap(), Payload::Pong);
}

#[test]
fn test_closed_connection_leaves_registry() {
    let (server, addr) = setup_server();
    {
        let mut conn = dial(&addr);
        conn.round_trip(&Command::Ping).unwrap();
        assert_eq!(server.connection_count(), 1);
    }

    // Worker notices EOF and drops its ticket
    let mut waited = 0;
    while server.connection_count() > 0 && waited < 100 {
        thread::sleep(Duration::from_millis(10));
        waited += 1;
    }
    assert_eq!(server.connection_count(), 0);
}
