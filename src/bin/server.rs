//! rushkv Server Binary
//!
//! Starts the TCP server for rushkv.

use std::sync::Arc;

use clap::Parser;
use rushkv::network::Server;
use rushkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// rushkv Server
#[derive(Parser, Debug)]
#[command(name = "rushkv-server")]
#[command(about = "In-memory typed key-value store with order transactions")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Idle read timeout per connection in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Token of the account credited by order payments
    #[arg(long, default_value = rushkv::txn::keys::ROOT_USER_TOKEN)]
    settlement_token: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rushkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("rushkv server v{}", rushkv::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = match Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let engine = Arc::new(Engine::with_settlement_account(args.settlement_token));

    // Binding failure is fatal
    let mut server = Server::new(config, engine);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
