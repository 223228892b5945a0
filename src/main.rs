use crate::config::Config;
use crate::db::listings::ListingStore;
use crate::router::respond;
use crate::state::AppState;
use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod middleware;
mod responses;
mod router;
mod state;


fn main() {
    // 1. Configuration (.env, then process environment)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // 2. Logging: RUST_LOG wins, LOG_LEVEL otherwise
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 3. Load listings once; a bad source is fatal
    let store = match ListingStore::open(&config.listings_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "failed to load listings");
            std::process::exit(1);
        }
    };
    if store.snapshot().is_empty() {
        warn!(path = %config.listings_path.display(), "listings file is empty");
    }

    // 4. Start the server
    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %config.bind_addr(), error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };
    let max_workers = config.max_workers;
    let state = Arc::new(AppState::new(config, store));

    info!(
        %addr,
        max_workers,
        base = %state.api_base,
        env = %state.config.environment,
        "starting server"
    );

    let server = Server::bind(&addr).max_workers(max_workers);

    // 5. Serve requests, passing shared state into closure
    let result = server.serve(move |req, info: astra::ConnectionInfo| {
        respond(req, info.peer_addr().map(|a| a.ip()), &state)
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        std::process::exit(1);
    }

    info!("server shut down cleanly");
}
