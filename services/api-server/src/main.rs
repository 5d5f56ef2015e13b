use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

use flexiflo_api::{create_app, AppState};
use flexiflo_database::{initialize_database, MongoRepository};
use flexiflo_models::{FinalInspectionReport, JobSheet};
use flexiflo_utils::{init_logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Flexiflo QC records API");

    let (_client, database) = match initialize_database(&config.database).await {
        Ok(connection) => connection,
        Err(e) => {
            error!(error = %e, "Storage connection failed");
            return Err(e.context("Cannot start without storage"));
        }
    };
    info!("Database connection established");

    let state = AppState::new(
        Arc::new(MongoRepository::<JobSheet>::new(&database)),
        Arc::new(MongoRepository::<FinalInspectionReport>::new(&database)),
        config.clone(),
    )
    .context("Failed to register metrics")?;
    let app = create_app(state);

    let host = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .context("Invalid server host")?;
    let addr = SocketAddr::from((host, config.server.port));
    let listener = TcpListener::bind(&addr).await?;
    info!("API listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}
