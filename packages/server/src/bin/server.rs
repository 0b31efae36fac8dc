//! Broadcast relay server.
//!
//! Every text message received from a client is rebroadcast to all connected
//! clients, the sender included.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --pong-wait-secs 30
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;

use hiroba_server::{
    config::{
        DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PONG_WAIT, DEFAULT_SEND_BUFFER_SIZE, DEFAULT_WRITE_WAIT,
        RelayConfig,
    },
    hub::Hub,
    infrastructure::session::InMemorySessionStore,
    ui::Server,
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket broadcast relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds allowed for a single write to a client
    #[arg(long, default_value_t = DEFAULT_WRITE_WAIT.as_secs())]
    write_wait_secs: u64,

    /// Seconds a client may stay silent before it is dropped (pings go out at 90% of this)
    #[arg(long, default_value_t = DEFAULT_PONG_WAIT.as_secs())]
    pong_wait_secs: u64,

    /// Largest accepted inbound message in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Outbound queue capacity per client
    #[arg(long, default_value_t = DEFAULT_SEND_BUFFER_SIZE)]
    send_buffer_size: usize,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            write_wait: Duration::from_secs(self.write_wait_secs),
            pong_wait: Duration::from_secs(self.pong_wait_secs),
            max_message_size: self.max_message_size,
            send_buffer_size: self.send_buffer_size,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let config = match args.relay_config().validate() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Relay tuning: write_wait={:?}, pong_wait={:?}, ping_period={:?}, max_message_size={}, send_buffer_size={}",
        config.write_wait,
        config.pong_wait,
        config.ping_period(),
        config.max_message_size,
        config.send_buffer_size
    );

    // 1. Start the hub control loop
    let (hub, _hub_task) = Hub::spawn();

    // 2. Create the session collaborator
    let sessions = Arc::new(InMemorySessionStore::new());

    // 3. Create and run the server
    let server = Server::new(hub, config, sessions);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
