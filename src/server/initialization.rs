// src/server/initialization.rs

//! Handles the complete server initialization process, from catalog loading
//! to state and command registry setup.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::commands::CommandRegistry;
use crate::core::handler::Dispatcher;
use crate::core::library::{Catalog, MemoryCatalog};
use crate::core::state::ServerState;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Initializes all server components before starting the main loop.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);
    let (shutdown_tx, _) = broadcast::channel(1);

    let catalog = load_catalog(&config)?;
    let registry = Arc::new(CommandRegistry::new()?);
    info!("Command registry ready with {} commands.", registry.len());

    let state = Arc::new(ServerState::new(config, catalog));
    let dispatcher = Dispatcher::new(state.clone(), registry);
    info!("Server state initialized.");

    let listener = TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
    info!(
        "SpinelTune server listening on {}:{}",
        state.config.host, state.config.port
    );
    let connection_permits = Arc::new(Semaphore::new(state.config.max_clients));

    Ok(ServerContext {
        state,
        dispatcher,
        listener,
        shutdown_tx,
        background_tasks: JoinSet::new(),
        connection_permits,
    })
}

/// Loads the media catalog named in the configuration, or an empty one.
fn load_catalog(config: &Config) -> Result<Arc<dyn Catalog>> {
    match &config.catalog_file {
        Some(path) => Ok(Arc::new(MemoryCatalog::from_file(path)?)),
        None => {
            warn!("No 'catalog_file' configured. The media catalog is empty.");
            Ok(Arc::new(MemoryCatalog::default()))
        }
    }
}

/// Logs key configuration parameters at startup.
fn log_startup_info(config: &Config) {
    if config.password.is_some() {
        info!("Password authentication is enabled.");
    } else {
        warn!("WARNING: No 'password' is set. Every client is authenticated on connect.");
    }
    match config.connection_timeout() {
        Some(timeout) => info!("Inactive clients are disconnected after {:?}.", timeout),
        None => info!("Client inactivity timeout is disabled."),
    }
    info!("Server accepts at most {} clients.", config.max_clients);
}
