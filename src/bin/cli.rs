//! rushkv CLI Client
//!
//! Command-line interface for interacting with rushkv.

use clap::{Parser, Subcommand};
use rushkv::{Client, CompareOp, Config, RemoteCall, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// rushkv CLI
#[derive(Parser, Debug)]
#[command(name = "rushkv-cli")]
#[command(about = "CLI for the rushkv key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    server: String,

    /// Dial timeout in milliseconds
    #[arg(long, default_value = "1000")]
    dial_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Get a scalar by key
    Get { key: String },

    /// Set a scalar
    Put { key: String, value: String },

    /// Delete a scalar
    Del { key: String },

    /// Add to an integer scalar
    Incr {
        key: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Set to VALUE if `current <CMP> BASE` (cmp: eq ne lt le gt ge)
    Cas {
        key: String,
        cmp: CompareOp,
        #[arg(allow_hyphen_values = true)]
        base: i64,
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },

    /// Add DELTA if `current <CMP> BASE` (cmp: eq ne lt le gt ge)
    Cai {
        key: String,
        cmp: CompareOp,
        #[arg(allow_hyphen_values = true)]
        base: i64,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Get one field of a map
    Hget { key: String, field: String },

    /// Set one field of a map
    Hset {
        key: String,
        field: String,
        value: String,
    },

    /// Add to an integer field
    Hincr {
        key: String,
        field: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Delete one field of a map
    Hdel { key: String, field: String },

    /// Delete a whole map
    Hdelall { key: String },

    /// Print every field of a map
    Hgetall { key: String },

    /// Add a set member
    Sadd { key: String, member: String },

    /// Test set membership
    Sismember { key: String, member: String },

    /// Delete a whole set
    Sdel { key: String },

    /// Submit a cart as an order
    Submit {
        cart_id: String,
        user_token: String,
        /// Cart value, e.g. "3;1:2,7:1"
        cart_value: String,
    },

    /// Pay an order
    Pay {
        order_id: String,
        user_token: String,
        amount: i64,
    },

    /// Show a user's order
    Order { user_token: String },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let config = Config {
        dial_timeout_ms: args.dial_timeout_ms,
        ..Config::default()
    };
    let client = Client::with_config(args.server, &config);

    if let Err(e) = execute(&client, args.command) {
        eprintln!("(error) {}", e);
        std::process::exit(1);
    }
}

/// Run one subcommand and print its result
fn execute(client: &Client, command: Commands) -> Result<()> {
    let reply = match command {
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
            return Ok(());
        }
        Commands::Hgetall { key } => {
            let reply = client.hget_all(&key)?;
            if !reply.flag {
                println!("(nil)");
            }
            let mut fields: Vec<_> = reply.value.into_iter().collect();
            fields.sort();
            for (field, value) in fields {
                println!("{} = {}", field, value);
            }
            return Ok(());
        }
        Commands::Submit {
            cart_id,
            user_token,
            cart_value,
        } => {
            let status = client.submit_order(&cart_id, &user_token, &cart_value)?;
            println!("{} ({})", status, status.code());
            return Ok(());
        }
        Commands::Pay {
            order_id,
            user_token,
            amount,
        } => {
            let status = client.pay_order(&order_id, &user_token, amount)?;
            println!("{} ({})", status, status.code());
            return Ok(());
        }
        Commands::Order { user_token } => {
            match client.query_order(&user_token)? {
                Some(order) => println!("{}", order),
                None => println!("(nil)"),
            }
            return Ok(());
        }

        Commands::Get { key } => client.get(&key)?,
        Commands::Put { key, value } => client.put(&key, &value)?,
        Commands::Del { key } => client.del(&key)?,
        Commands::Incr { key, delta } => client.incr(&key, delta)?,
        Commands::Cas {
            key,
            cmp,
            base,
            value,
        } => client.compare_and_set(&key, base, value, cmp)?,
        Commands::Cai {
            key,
            cmp,
            base,
            delta,
        } => client.compare_and_incr(&key, base, delta, cmp)?,
        Commands::Hget { key, field } => client.hget(&key, &field)?,
        Commands::Hset { key, field, value } => client.hset(&key, &field, &value)?,
        Commands::Hincr { key, field, delta } => client.hincr(&key, &field, delta)?,
        Commands::Hdel { key, field } => client.hdel(&key, &field)?,
        Commands::Hdelall { key } => client.hdel_all(&key)?,
        Commands::Sadd { key, member } => client.sadd(&key, &member)?,
        Commands::Sismember { key, member } => client.sis_member(&key, &member)?,
        Commands::Sdel { key } => client.sdel(&key)?,
    };

    println!("({}) {:?}", reply.flag, reply.value);
    Ok(())
}
