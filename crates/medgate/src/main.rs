//! MedGate server
//!
//! Multi-tenant clinical records API with role-based access control.

use std::sync::Arc;

use clap::Parser;
use medgate_rest::{
    MemoryStore, ServerConfig, StaticTokenVerifier, bootstrap_super_admin,
    create_app_with_config, init_logging,
};
use tracing::{info, warn};

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        "Starting MedGate server"
    );

    let store = MemoryStore::new();
    let verifier = Arc::new(StaticTokenVerifier::new());

    match bootstrap_super_admin(&store, &verifier, &config)
        .await
        .map_err(|e| anyhow::anyhow!("Bootstrap failed: {}", e))?
    {
        Some(account) => info!(identity = %account.id, "Super admin token registered"),
        None => warn!("No bootstrap token configured; every API request will be rejected"),
    }

    let app = create_app_with_config(store, verifier, config.clone());
    serve(app, &config).await
}
