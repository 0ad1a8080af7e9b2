//! Voting Server - Entry Point
//!
//! A TCP voting server: clients cast or change a single-option vote and
//! every connected client receives live tallies and the vote history.

use log::{error, info};

use vote_server::Server;
use vote_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching voting server...");

    let server = Server::new(config).await;
    server.start().await;
}
